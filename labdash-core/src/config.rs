use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::error::{LabdashError, LabdashResult};
use crate::pricing::PricingTable;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LabdashConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub terraform: TerraformConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,

    #[serde(default = "default_terraform_dir")]
    pub terraform_dir: PathBuf,

    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: PathBuf,

    #[serde(default = "default_session_suffix")]
    pub session_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerraformConfig {
    #[serde(default = "default_terraform_binary")]
    pub binary: String,

    /// Inserted before every subcommand, e.g. `["-chdir=stacks/lab"]`.
    #[serde(default)]
    pub prefix_args: Vec<String>,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    #[serde(default = "default_clusters_timeout")]
    pub clusters_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_region")]
    pub region: String,

    /// Per-instance-type hourly rates layered over the built-in table.
    #[serde(default)]
    pub ec2: BTreeMap<String, f64>,

    #[serde(default = "default_nat_gateway_hourly")]
    pub nat_gateway_hourly: f64,

    #[serde(default = "default_ebs_gp3_gb_month")]
    pub ebs_gp3_gb_month: f64,

    #[serde(default = "default_master_fallback")]
    pub master_fallback_hourly: f64,

    #[serde(default = "default_worker_fallback")]
    pub worker_fallback_hourly: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_costs: bool,

    #[serde(default = "default_cost_precision")]
    pub cost_precision: usize,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_terraform_dir() -> PathBuf {
    PathBuf::from("terraform")
}

fn default_sessions_dir() -> PathBuf {
    PathBuf::from("sessions")
}

fn default_session_suffix() -> String {
    ".tfvars".to_string()
}

fn default_terraform_binary() -> String {
    "terraform".to_string()
}

fn default_command_timeout() -> u64 {
    5
}

fn default_clusters_timeout() -> u64 {
    10
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

fn default_nat_gateway_hourly() -> f64 {
    crate::pricing::NAT_GATEWAY_HOURLY
}

fn default_ebs_gp3_gb_month() -> f64 {
    crate::pricing::EBS_GP3_GB_MONTH
}

fn default_master_fallback() -> f64 {
    crate::pricing::MASTER_FALLBACK_HOURLY
}

fn default_worker_fallback() -> f64 {
    crate::pricing::WORKER_FALLBACK_HOURLY
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cost_precision() -> usize {
    4
}

fn default_refresh_interval() -> u64 {
    30
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            terraform_dir: default_terraform_dir(),
            sessions_dir: default_sessions_dir(),
            session_suffix: default_session_suffix(),
        }
    }
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            binary: default_terraform_binary(),
            prefix_args: Vec::new(),
            command_timeout_secs: default_command_timeout(),
            clusters_timeout_secs: default_clusters_timeout(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            ec2: BTreeMap::new(),
            nat_gateway_hourly: default_nat_gateway_hourly(),
            ebs_gp3_gb_month: default_ebs_gp3_gb_month(),
            master_fallback_hourly: default_master_fallback(),
            worker_fallback_hourly: default_worker_fallback(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_costs: true,
            cost_precision: default_cost_precision(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl PathsConfig {
    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.project_root.join(dir)
        }
    }

    pub fn terraform_dir(&self) -> PathBuf {
        self.resolve(&self.terraform_dir)
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.resolve(&self.sessions_dir)
    }
}

impl TerraformConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn clusters_timeout(&self) -> Duration {
        Duration::from_secs(self.clusters_timeout_secs)
    }
}

impl PricingConfig {
    /// The built-in table with configured overrides applied.
    pub fn to_table(&self) -> PricingTable {
        let mut table = PricingTable::default()
            .with_nat_gateway_hourly(self.nat_gateway_hourly)
            .with_ebs_gb_month(self.ebs_gp3_gb_month)
            .with_fallbacks(self.master_fallback_hourly, self.worker_fallback_hourly);
        for (instance_type, rate) in &self.ec2 {
            table = table.with_instance_rate(instance_type, *rate);
        }
        table
    }
}

impl LabdashConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("LABDASH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut labdash_config: LabdashConfig = config.try_deserialize()?;

        if let Ok(root) = std::env::var("LABDASH_PROJECT_ROOT") {
            labdash_config.paths.project_root = PathBuf::from(root);
        }

        if let Ok(dir) = std::env::var("LABDASH_TERRAFORM_DIR") {
            labdash_config.paths.terraform_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("LABDASH_SESSIONS_DIR") {
            labdash_config.paths.sessions_dir = PathBuf::from(dir);
        }

        if let Ok(level) = std::env::var("LABDASH_LOG_LEVEL") {
            labdash_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            labdash_config.logging.level = level;
        }

        labdash_config.validate()?;

        Ok(labdash_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.terraform.binary.trim().is_empty() {
            return Err(ConfigLoadError::MissingRequired(
                "terraform.binary".to_string(),
            ));
        }

        if self.paths.session_suffix.is_empty() {
            return Err(ConfigLoadError::InvalidValue {
                key: "paths.session_suffix".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        if self.terraform.command_timeout_secs == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "terraform.command_timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.terraform.clusters_timeout_secs == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "terraform.clusters_timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.display.refresh_interval_secs == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "display.refresh_interval_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let rates = [
            ("pricing.nat_gateway_hourly", self.pricing.nat_gateway_hourly),
            ("pricing.ebs_gp3_gb_month", self.pricing.ebs_gp3_gb_month),
            (
                "pricing.master_fallback_hourly",
                self.pricing.master_fallback_hourly,
            ),
            (
                "pricing.worker_fallback_hourly",
                self.pricing.worker_fallback_hourly,
            ),
        ];
        for (key, rate) in rates {
            if !(rate.is_finite() && rate >= 0.0) {
                return Err(ConfigLoadError::InvalidValue {
                    key: key.to_string(),
                    message: format!("Rate must be a non-negative number, got {}", rate),
                });
            }
        }
        for (instance_type, rate) in &self.pricing.ec2 {
            if !(rate.is_finite() && *rate >= 0.0) {
                return Err(ConfigLoadError::InvalidValue {
                    key: format!("pricing.ec2.{}", instance_type),
                    message: format!("Rate must be a non-negative number, got {}", rate),
                });
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    pub fn pricing_table(&self) -> PricingTable {
        self.pricing.to_table()
    }

    /// Effective configuration rendered as TOML.
    pub fn to_toml(&self) -> LabdashResult<String> {
        toml::to_string_pretty(self).map_err(|e| LabdashError::SerializationError(e.to_string()))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("labdash.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("labdash").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".labdash").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let env_paths = get_dotenv_paths();

    for path in env_paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn get_dotenv_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
        paths.push(cwd.join(".env.local"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".labdash").join(".env"));
    }

    paths
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("labdash"))
}
