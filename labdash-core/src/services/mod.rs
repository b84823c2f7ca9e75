pub mod cost_estimator;
pub mod normalizer;
pub mod snapshot_aggregator;

pub use cost_estimator::{CostEstimator, EBS_MASTER_VOLUME_GB, EBS_WORKER_VOLUME_GB};
pub use normalizer::{normalize, normalize_clusters};
pub use snapshot_aggregator::SnapshotAggregator;
