//! Static AWS pricing used for the hourly estimate.
//!
//! Rates are eu-west-1 on-demand prices in USD per hour (AWS Pricing
//! Calculator, December 2025). There are no live lookups; a table is built
//! once at startup and handed to the estimator by value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hourly price of one NAT gateway.
pub const NAT_GATEWAY_HOURLY: f64 = 0.045;

/// gp3 storage price per GB-month.
pub const EBS_GP3_GB_MONTH: f64 = 0.088;

/// Average hours in a month, used to turn GB-month into GB-hour.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Rate charged for a master whose instance type is not in the table (t3.medium).
pub const MASTER_FALLBACK_HOURLY: f64 = 0.0416;

/// Rate charged for a worker whose instance type is not in the table (t3.small).
pub const WORKER_FALLBACK_HOURLY: f64 = 0.0208;

const EC2_HOURLY: &[(&str, f64)] = &[
    ("t3.nano", 0.0052),
    ("t3.micro", 0.0104),
    ("t3.small", 0.0208),
    ("t3.medium", 0.0416),
    ("t3.large", 0.0832),
    ("t3.xlarge", 0.1664),
    ("t3.2xlarge", 0.3328),
    ("t2.micro", 0.0126),
    ("t2.small", 0.023),
    ("t2.medium", 0.0464),
    ("t2.large", 0.0928),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    ec2: HashMap<String, f64>,
    nat_gateway_hourly: f64,
    ebs_gb_month: f64,
    master_fallback_hourly: f64,
    worker_fallback_hourly: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            ec2: EC2_HOURLY
                .iter()
                .map(|(name, rate)| (name.to_string(), *rate))
                .collect(),
            nat_gateway_hourly: NAT_GATEWAY_HOURLY,
            ebs_gb_month: EBS_GP3_GB_MONTH,
            master_fallback_hourly: MASTER_FALLBACK_HOURLY,
            worker_fallback_hourly: WORKER_FALLBACK_HOURLY,
        }
    }
}

impl PricingTable {
    /// A table with no instance rates; every lookup falls back.
    pub fn empty() -> Self {
        Self {
            ec2: HashMap::new(),
            ..Self::default()
        }
    }

    pub fn with_instance_rate(mut self, instance_type: &str, hourly: f64) -> Self {
        self.ec2.insert(instance_type.to_string(), hourly);
        self
    }

    pub fn with_nat_gateway_hourly(mut self, hourly: f64) -> Self {
        self.nat_gateway_hourly = hourly;
        self
    }

    pub fn with_ebs_gb_month(mut self, gb_month: f64) -> Self {
        self.ebs_gb_month = gb_month;
        self
    }

    pub fn with_fallbacks(mut self, master_hourly: f64, worker_hourly: f64) -> Self {
        self.master_fallback_hourly = master_hourly;
        self.worker_fallback_hourly = worker_hourly;
        self
    }

    pub fn instance_rate(&self, instance_type: &str) -> Option<f64> {
        self.ec2.get(instance_type).copied()
    }

    pub fn master_rate(&self, instance_type: &str) -> f64 {
        self.instance_rate(instance_type)
            .unwrap_or(self.master_fallback_hourly)
    }

    pub fn worker_rate(&self, instance_type: &str) -> f64 {
        self.instance_rate(instance_type)
            .unwrap_or(self.worker_fallback_hourly)
    }

    pub fn nat_gateway_hourly(&self) -> f64 {
        self.nat_gateway_hourly
    }

    pub fn ebs_gb_hour(&self) -> f64 {
        self.ebs_gb_month / HOURS_PER_MONTH
    }

    /// Known instance types, sorted.
    pub fn instance_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ec2.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
