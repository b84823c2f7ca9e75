pub mod cost;
pub mod sessions;
pub mod snapshot;
pub mod status;
pub mod watch;

use labdash_core::{LabdashConfig, SnapshotAggregator, SnapshotFields};

pub use cost::cmd_cost;
pub use sessions::{cmd_sessions, cmd_workspace};
pub use snapshot::cmd_snapshot;
pub use status::{cmd_config, cmd_health, cmd_status};
pub use watch::cmd_watch;

/// Loaded configuration plus the aggregator built from it, shared by every
/// command.
pub struct Context {
    pub config: LabdashConfig,
    pub aggregator: SnapshotAggregator,
}

impl Context {
    pub fn new(config: LabdashConfig) -> Self {
        let aggregator = SnapshotAggregator::from_config(&config);
        Self { config, aggregator }
    }

    pub fn snapshot_fields(&self, no_cost: bool) -> SnapshotFields {
        if no_cost || !self.config.display.show_costs {
            SnapshotFields::without_cost()
        } else {
            SnapshotFields::default()
        }
    }

    pub fn cost_precision(&self) -> usize {
        self.config.display.cost_precision
    }
}
