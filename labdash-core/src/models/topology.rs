use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_MASTER_INSTANCE_TYPE: &str = "t3.medium";
pub const DEFAULT_WORKER_INSTANCE_TYPE: &str = "t3.small";
pub const DEFAULT_WORKER_COUNT: u32 = 2;
pub const DEFAULT_NAT_GATEWAY_COUNT: u32 = 2;

/// Sizing of every participant cluster in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub master_instance_type: String,
    pub worker_instance_type: String,
    /// Workers per participant cluster.
    pub worker_count: u32,
    /// One NAT gateway per availability zone, shared by all clusters.
    pub nat_gateway_count: u32,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            master_instance_type: DEFAULT_MASTER_INSTANCE_TYPE.to_string(),
            worker_instance_type: DEFAULT_WORKER_INSTANCE_TYPE.to_string(),
            worker_count: DEFAULT_WORKER_COUNT,
            nat_gateway_count: DEFAULT_NAT_GATEWAY_COUNT,
        }
    }
}

impl Topology {
    pub fn new(
        master_instance_type: impl Into<String>,
        worker_instance_type: impl Into<String>,
        worker_count: u32,
        nat_gateway_count: u32,
    ) -> Self {
        Self {
            master_instance_type: master_instance_type.into(),
            worker_instance_type: worker_instance_type.into(),
            worker_count,
            nat_gateway_count,
        }
    }

    /// Builds a topology from the raw `instance_type_master`,
    /// `instance_type_worker`, `worker_count` and `availability_zones`
    /// outputs. Each field falls back to its default on its own when the
    /// output is missing or has the wrong shape.
    pub fn from_outputs(
        master: Option<&Value>,
        worker: Option<&Value>,
        worker_count: Option<&Value>,
        availability_zones: Option<&Value>,
    ) -> Self {
        let defaults = Self::default();

        Self {
            master_instance_type: master
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(defaults.master_instance_type),
            worker_instance_type: worker
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(defaults.worker_instance_type),
            worker_count: worker_count
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.worker_count),
            nat_gateway_count: availability_zones
                .and_then(Value::as_array)
                .and_then(|zones| u32::try_from(zones.len()).ok())
                .unwrap_or(defaults.nat_gateway_count),
        }
    }
}
