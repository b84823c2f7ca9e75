use serde::{Deserialize, Serialize};

/// Placeholder for an address the provisioning output did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Access details for one participant's cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub name: String,
    /// Public address of the master node.
    pub master_ip: String,
    pub master_private_ip: String,
    /// Length of `worker_public_ips`; the private list is not consulted.
    pub worker_count: usize,
    pub worker_public_ips: Vec<String>,
    pub worker_private_ips: Vec<String>,
    pub ssh_command: String,
}

impl ParticipantRecord {
    pub fn new(
        name: impl Into<String>,
        master_ip: impl Into<String>,
        master_private_ip: impl Into<String>,
        worker_public_ips: Vec<String>,
        worker_private_ips: Vec<String>,
    ) -> Self {
        let master_ip = master_ip.into();
        Self {
            name: name.into(),
            ssh_command: ssh_command_for(&master_ip),
            master_ip,
            master_private_ip: master_private_ip.into(),
            worker_count: worker_public_ips.len(),
            worker_public_ips,
            worker_private_ips,
        }
    }
}

fn ssh_command_for(master_ip: &str) -> String {
    format!("ssh ubuntu@{}", master_ip)
}
