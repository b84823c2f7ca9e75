use tracing::debug;

use crate::models::{CostBreakdown, CostDetail, Topology};
use crate::pricing::PricingTable;

/// Root volume of every master node.
pub const EBS_MASTER_VOLUME_GB: u64 = 30;

/// Root volume of every worker node.
pub const EBS_WORKER_VOLUME_GB: u64 = 20;

pub struct CostEstimator {
    pricing: PricingTable,
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(PricingTable::default())
    }
}

impl CostEstimator {
    pub fn new(pricing: PricingTable) -> Self {
        Self { pricing }
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Hourly cost of `participant_count` identical clusters plus the shared
    /// NAT gateways. Unknown instance types are charged at the fallback rates.
    pub fn estimate(&self, participant_count: usize, topology: &Topology) -> CostBreakdown {
        let master_rate = self.pricing.master_rate(&topology.master_instance_type);
        let worker_rate = self.pricing.worker_rate(&topology.worker_instance_type);
        let workers = f64::from(topology.worker_count);
        let clusters = participant_count as f64;

        let ec2_per_cluster = master_rate + worker_rate * workers;
        let ec2 = ec2_per_cluster * clusters;

        let storage_gb = participant_count as u64
            * (EBS_MASTER_VOLUME_GB + EBS_WORKER_VOLUME_GB * u64::from(topology.worker_count));
        let ebs = storage_gb as f64 * self.pricing.ebs_gb_hour();

        let nat_gateway = f64::from(topology.nat_gateway_count) * self.pricing.nat_gateway_hourly();

        let total_hourly = ec2 + ebs + nat_gateway;

        debug!(
            clusters = participant_count,
            ec2, ebs, nat_gateway, total_hourly, "Estimated hourly cost"
        );

        CostBreakdown {
            total_hourly,
            ec2,
            ebs,
            nat_gateway,
            breakdown: Some(CostDetail {
                master_instance_type: topology.master_instance_type.clone(),
                master_hourly_cost: master_rate,
                worker_instance_type: topology.worker_instance_type.clone(),
                worker_hourly_cost: worker_rate,
                worker_count_per_cluster: topology.worker_count,
                clusters: participant_count,
                nat_gateways: topology.nat_gateway_count,
                storage_gb,
            }),
        }
    }
}
