use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::LabdashConfig;
use crate::error::{InfraError, InfraResult};
use crate::infra::{InfraQuery, TerraformClient};
use crate::models::{CostReport, HealthReport, SessionListing, SessionSnapshot, Topology};
use crate::sessions::SessionDirectory;

use super::cost_estimator::CostEstimator;
use super::normalizer::normalize_clusters;

const CLUSTERS_OUTPUT: &str = "clusters";
const MASTER_TYPE_OUTPUT: &str = "instance_type_master";
const WORKER_TYPE_OUTPUT: &str = "instance_type_worker";
const WORKER_COUNT_OUTPUT: &str = "worker_count";
const AVAILABILITY_ZONES_OUTPUT: &str = "availability_zones";

/// Entry point for presentation layers. Every method returns a complete,
/// serializable value; failures are folded into the value instead of being
/// returned as errors.
pub struct SnapshotAggregator {
    infra: Arc<dyn InfraQuery>,
    sessions: SessionDirectory,
    estimator: CostEstimator,
}

impl SnapshotAggregator {
    pub fn new(
        infra: Arc<dyn InfraQuery>,
        sessions: SessionDirectory,
        estimator: CostEstimator,
    ) -> Self {
        Self {
            infra,
            sessions,
            estimator,
        }
    }

    pub fn from_config(config: &LabdashConfig) -> Self {
        Self::new(
            Arc::new(TerraformClient::from_config(config)),
            SessionDirectory::from_config(&config.paths),
            CostEstimator::new(config.pricing_table()),
        )
    }

    pub fn sessions(&self) -> &SessionDirectory {
        &self.sessions
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    pub fn list_sessions(&self) -> Vec<String> {
        self.sessions.list_sessions()
    }

    pub async fn current_workspace(&self) -> Option<String> {
        self.infra.current_workspace().await
    }

    pub async fn session_listing(&self) -> SessionListing {
        SessionListing {
            sessions: self.list_sessions(),
            current: self.current_workspace().await,
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport::ok()
    }

    pub async fn cost_report(&self, session: Option<&str>) -> CostReport {
        CostReport::from(self.build_snapshot(session).await)
    }

    /// Reads the participants of `session` (or of the active workspace when
    /// `None`) and prices the session.
    pub async fn build_snapshot(&self, session: Option<&str>) -> SessionSnapshot {
        if let Some(session) = session {
            self.infra.select_workspace(session).await;
        }

        let current = self.infra.current_workspace().await;

        let clusters = match self.read_clusters().await {
            Ok(clusters) => clusters,
            Err(e) => {
                e.log();
                error!(
                    session = current.as_deref().unwrap_or("-"),
                    "Snapshot degraded: {}",
                    e.snapshot_message()
                );
                return SessionSnapshot::failed(current, e.snapshot_message())
                    .with_suggestion(e.user_suggestion());
            }
        };

        let participants = normalize_clusters(&clusters);
        let topology = self.read_topology().await;
        let cost = self.estimator.estimate(participants.len(), &topology);

        info!(
            session = current.as_deref().unwrap_or("-"),
            participants = participants.len(),
            total_hourly = cost.total_hourly,
            "Built session snapshot"
        );

        SessionSnapshot::new(current, participants, cost)
    }

    async fn read_clusters(&self) -> InfraResult<serde_json::Map<String, Value>> {
        let value = self
            .infra
            .read_output(CLUSTERS_OUTPUT, self.infra.clusters_timeout())
            .await?;

        match value {
            Value::Object(clusters) => Ok(clusters),
            other => Err(InfraError::MalformedOutput {
                command: format!("output -json {}", CLUSTERS_OUTPUT),
                message: format!("expected an object of participants, got {}", json_kind(&other)),
            }),
        }
    }

    /// The four reads are independent, so they run together and each one
    /// falls back to its own default.
    pub async fn read_topology(&self) -> Topology {
        let timeout = self.infra.command_timeout();
        let (master, worker, worker_count, zones) = tokio::join!(
            self.infra.read_output(MASTER_TYPE_OUTPUT, timeout),
            self.infra.read_output(WORKER_TYPE_OUTPUT, timeout),
            self.infra.read_output(WORKER_COUNT_OUTPUT, timeout),
            self.infra.read_output(AVAILABILITY_ZONES_OUTPUT, timeout),
        );

        Topology::from_outputs(
            optional_output(MASTER_TYPE_OUTPUT, master).as_ref(),
            optional_output(WORKER_TYPE_OUTPUT, worker).as_ref(),
            optional_output(WORKER_COUNT_OUTPUT, worker_count).as_ref(),
            optional_output(AVAILABILITY_ZONES_OUTPUT, zones).as_ref(),
        )
    }
}

fn optional_output(key: &str, result: InfraResult<Value>) -> Option<Value> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Using default for '{}': {}", key, e);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
