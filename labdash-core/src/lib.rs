//! Session-state aggregation and cost estimation for Kubernetes lab
//! environments provisioned with Terraform.
//!
//! A presentation layer builds one [`SnapshotAggregator`] at startup and calls
//! [`SnapshotAggregator::list_sessions`], [`SnapshotAggregator::current_workspace`]
//! and [`SnapshotAggregator::build_snapshot`]; none of them return errors.

pub mod config;
pub mod error;
pub mod infra;
pub mod models;
pub mod pricing;
pub mod services;
pub mod sessions;

pub use config::{
    get_config_dir, ConfigLoadError, DisplayConfig, LabdashConfig, LoggingConfig, PathsConfig,
    PricingConfig, TerraformConfig,
};
pub use error::{CliErrorDisplay, InfraError, InfraResult, LabdashError, LabdashResult};
pub use infra::{InfraQuery, TerraformClient};
pub use models::{
    CostBreakdown, CostDetail, CostReport, HealthReport, ParticipantRecord, SessionListing,
    SessionSnapshot, SnapshotFields, Topology,
};
pub use pricing::PricingTable;
pub use services::{normalize, normalize_clusters, CostEstimator, SnapshotAggregator};
pub use sessions::SessionDirectory;
