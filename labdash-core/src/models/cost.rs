use serde::{Deserialize, Serialize};

/// Hourly cost of a session in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total_hourly: f64,
    pub ec2: f64,
    pub ebs: f64,
    pub nat_gateway: f64,
    /// Inputs used to produce the figures above; absent on a zeroed cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDetail {
    pub master_instance_type: String,
    pub master_hourly_cost: f64,
    pub worker_instance_type: String,
    pub worker_hourly_cost: f64,
    pub worker_count_per_cluster: u32,
    pub clusters: usize,
    pub nat_gateways: u32,
    pub storage_gb: u64,
}

impl Default for CostBreakdown {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl CostBreakdown {
    pub fn zeroed() -> Self {
        Self {
            total_hourly: 0.0,
            ec2: 0.0,
            ebs: 0.0,
            nat_gateway: 0.0,
            breakdown: None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_hourly == 0.0 && self.ec2 == 0.0 && self.ebs == 0.0 && self.nat_gateway == 0.0
    }

    pub fn daily(&self) -> f64 {
        self.total_hourly * 24.0
    }
}
