mod terraform;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::InfraResult;

pub use terraform::TerraformClient;

/// Read access to the provisioning tool's workspace state.
///
/// `current_workspace` and `select_workspace` never fail: problems are
/// logged and absorbed. `read_output` reports one of the [`InfraError`]
/// kinds so the caller can decide how to degrade.
///
/// [`InfraError`]: crate::error::InfraError
#[async_trait]
pub trait InfraQuery: Send + Sync {
    async fn current_workspace(&self) -> Option<String>;

    async fn select_workspace(&self, workspace: &str);

    async fn read_output(&self, key: &str, timeout: Duration) -> InfraResult<Value>;

    /// Bound applied to workspace and variable reads.
    fn command_timeout(&self) -> Duration;

    /// Bound applied to the `clusters` read.
    fn clusters_timeout(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InfraError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct MockInfra {
        workspace: Arc<Mutex<Option<String>>>,
        outputs: HashMap<String, Value>,
    }

    #[async_trait]
    impl InfraQuery for MockInfra {
        async fn current_workspace(&self) -> Option<String> {
            self.workspace.lock().unwrap().clone()
        }

        async fn select_workspace(&self, workspace: &str) {
            *self.workspace.lock().unwrap() = Some(workspace.to_string());
        }

        async fn read_output(&self, key: &str, _timeout: Duration) -> InfraResult<Value> {
            self.outputs
                .get(key)
                .cloned()
                .ok_or_else(|| InfraError::NonZeroExit {
                    command: format!("terraform output -json {}", key),
                    code: Some(1),
                    stderr: format!("Output \"{}\" not found", key),
                })
        }

        fn command_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }

        fn clusters_timeout(&self) -> Duration {
            Duration::from_secs(10)
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let mut outputs = HashMap::new();
        outputs.insert("worker_count".to_string(), Value::from(3));

        let infra: Box<dyn InfraQuery> = Box::new(MockInfra {
            workspace: Arc::new(Mutex::new(None)),
            outputs,
        });

        assert_eq!(infra.current_workspace().await, None);
        infra.select_workspace("lab-a").await;
        assert_eq!(infra.current_workspace().await.as_deref(), Some("lab-a"));

        let count = infra
            .read_output("worker_count", infra.command_timeout())
            .await
            .unwrap();
        assert_eq!(count, Value::from(3));

        let missing = infra
            .read_output("clusters", infra.clusters_timeout())
            .await
            .unwrap_err();
        assert_eq!(missing.error_code(), "E2002");
    }
}
