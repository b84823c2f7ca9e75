use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, warn};

use super::InfraQuery;
use crate::config::LabdashConfig;
use crate::error::{InfraError, InfraResult};

const STDERR_PREVIEW_LEN: usize = 500;

/// Runs the `terraform` CLI against a fixed stack directory.
///
/// The directory is handed to each child process; the current directory of
/// this process is never touched. A child that outlives its timeout is
/// killed.
#[derive(Debug, Clone)]
pub struct TerraformClient {
    binary: String,
    prefix_args: Vec<String>,
    working_dir: PathBuf,
    command_timeout: Duration,
    clusters_timeout: Duration,
}

impl TerraformClient {
    pub fn new(binary: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            prefix_args: Vec::new(),
            working_dir: working_dir.into(),
            command_timeout: Duration::from_secs(5),
            clusters_timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &LabdashConfig) -> Self {
        Self::new(
            config.terraform.binary.clone(),
            config.paths.terraform_dir(),
        )
        .with_prefix_args(config.terraform.prefix_args.clone())
        .with_timeouts(
            config.terraform.command_timeout(),
            config.terraform.clusters_timeout(),
        )
    }

    pub fn with_prefix_args(mut self, args: Vec<String>) -> Self {
        self.prefix_args = args;
        self
    }

    pub fn with_timeouts(mut self, command: Duration, clusters: Duration) -> Self {
        self.command_timeout = command;
        self.clusters_timeout = clusters;
        self
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut parts = vec![self.binary.as_str()];
        parts.extend(self.prefix_args.iter().map(String::as_str));
        parts.extend_from_slice(args);
        parts.join(" ")
    }

    /// Runs one subcommand and returns its standard output.
    async fn run(&self, args: &[&str], timeout: Duration) -> InfraResult<Vec<u8>> {
        let command = self.command_line(args);
        debug!(
            "Running {} in {} (timeout {:?})",
            command,
            self.working_dir.display(),
            timeout
        );

        let child = Command::new(&self.binary)
            .args(&self.prefix_args)
            .args(args)
            .current_dir(&self.working_dir)
            .env("TF_IN_AUTOMATION", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| InfraError::ProcessLaunch {
                program: self.binary.clone(),
                message: e.to_string(),
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| InfraError::ProcessLaunch {
                program: self.binary.clone(),
                message: e.to_string(),
            })?,
            Err(_) => return Err(InfraError::Timeout { command, timeout }),
        };

        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            Err(InfraError::NonZeroExit {
                command,
                code: output.status.code(),
                stderr: stderr.chars().take(STDERR_PREVIEW_LEN).collect(),
            })
        }
    }
}

#[async_trait]
impl InfraQuery for TerraformClient {
    async fn current_workspace(&self) -> Option<String> {
        match self.run(&["workspace", "show"], self.command_timeout).await {
            Ok(stdout) => {
                let workspace = String::from_utf8_lossy(&stdout).trim().to_string();
                if workspace.is_empty() {
                    warn!("'terraform workspace show' printed nothing");
                    None
                } else {
                    Some(workspace)
                }
            }
            Err(e) => {
                e.log();
                None
            }
        }
    }

    async fn select_workspace(&self, workspace: &str) {
        match self
            .run(&["workspace", "select", workspace], self.command_timeout)
            .await
        {
            Ok(_) => debug!("Selected workspace {}", workspace),
            Err(e) => warn!(
                "Could not select workspace '{}', reading whichever is active: {}",
                workspace, e
            ),
        }
    }

    async fn read_output(&self, key: &str, timeout: Duration) -> InfraResult<Value> {
        let stdout = self.run(&["output", "-json", key], timeout).await?;

        serde_json::from_slice(&stdout).map_err(|e| InfraError::MalformedOutput {
            command: self.command_line(&["output", "-json", key]),
            message: e.to_string(),
        })
    }

    fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    fn clusters_timeout(&self) -> Duration {
        self.clusters_timeout
    }
}
