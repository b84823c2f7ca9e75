mod cost;
mod participant;
mod snapshot;
mod topology;

pub use cost::{CostBreakdown, CostDetail};
pub use participant::{ParticipantRecord, NOT_AVAILABLE};
pub use snapshot::{CostReport, HealthReport, SessionListing, SessionSnapshot, SnapshotFields};
pub use topology::Topology;
