//! Turns the raw `clusters` output into [`ParticipantRecord`]s.
//!
//! Normalization is total. Missing or mistyped fields degrade to `"N/A"` or an
//! empty list, so one half-provisioned participant cannot hide the others.

use serde_json::{Map, Value};

use crate::models::{ParticipantRecord, NOT_AVAILABLE};

const MASTER_PUBLIC_IP: &str = "master_public_ip";
const MASTER_PRIVATE_IP: &str = "master_private_ip";
const WORKER_PUBLIC_IPS: &str = "worker_public_ips";
const WORKER_PRIVATE_IPS: &str = "worker_private_ips";

pub fn normalize(name: &str, raw: &Map<String, Value>) -> ParticipantRecord {
    ParticipantRecord::new(
        name,
        ip_field(raw, MASTER_PUBLIC_IP),
        ip_field(raw, MASTER_PRIVATE_IP),
        ip_list(raw, WORKER_PUBLIC_IPS),
        ip_list(raw, WORKER_PRIVATE_IPS),
    )
}

/// Normalizes every entry of the `clusters` mapping in its source order.
pub fn normalize_clusters(clusters: &Map<String, Value>) -> Vec<ParticipantRecord> {
    let empty = Map::new();
    clusters
        .iter()
        .map(|(name, raw)| normalize(name, raw.as_object().unwrap_or(&empty)))
        .collect()
}

fn ip_field(raw: &Map<String, Value>, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

// Non-string entries are kept as their JSON text so the list length (and
// therefore the worker count) matches what Terraform reported.
fn ip_list(raw: &Map<String, Value>, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_full_record() {
        let raw = object(json!({
            "master_public_ip": "54.75.1.10",
            "master_private_ip": "10.0.1.10",
            "worker_public_ips": ["54.75.1.11", "54.75.1.12"],
            "worker_private_ips": ["10.0.1.11", "10.0.1.12"]
        }));

        let record = normalize("alice", &raw);

        assert_eq!(record.name, "alice");
        assert_eq!(record.master_ip, "54.75.1.10");
        assert_eq!(record.master_private_ip, "10.0.1.10");
        assert_eq!(record.worker_count, 2);
        assert_eq!(record.worker_public_ips, vec!["54.75.1.11", "54.75.1.12"]);
        assert_eq!(record.worker_private_ips, vec!["10.0.1.11", "10.0.1.12"]);
        assert_eq!(record.ssh_command, "ssh ubuntu@54.75.1.10");
    }

    #[test]
    fn test_normalize_empty_record() {
        let record = normalize("ghost", &Map::new());

        assert_eq!(record.master_ip, "N/A");
        assert_eq!(record.master_private_ip, "N/A");
        assert_eq!(record.worker_count, 0);
        assert!(record.worker_public_ips.is_empty());
        assert!(record.worker_private_ips.is_empty());
        assert_eq!(record.ssh_command, "ssh ubuntu@N/A");
    }

    #[test]
    fn test_normalize_master_only() {
        let raw = object(json!({ "master_public_ip": "34.240.0.5" }));
        let record = normalize("bob", &raw);

        assert_eq!(record.master_ip, "34.240.0.5");
        assert_eq!(record.master_private_ip, "N/A");
        assert_eq!(record.worker_count, 0);
        assert_eq!(record.ssh_command, "ssh ubuntu@34.240.0.5");
    }

    #[test]
    fn test_worker_count_follows_public_list() {
        let raw = object(json!({
            "worker_public_ips": ["54.75.1.11"],
            "worker_private_ips": ["10.0.1.11", "10.0.1.12", "10.0.1.13"]
        }));
        let record = normalize("carol", &raw);

        assert_eq!(record.worker_count, 1);
        assert_eq!(record.worker_private_ips.len(), 3);
    }

    #[test]
    fn test_mistyped_fields_degrade() {
        let raw = object(json!({
            "master_public_ip": null,
            "master_private_ip": 42,
            "worker_public_ips": "54.75.1.11",
            "worker_private_ips": ["10.0.1.11", null]
        }));
        let record = normalize("dave", &raw);

        assert_eq!(record.master_ip, "N/A");
        assert_eq!(record.master_private_ip, "N/A");
        assert_eq!(record.worker_count, 0);
        assert_eq!(record.worker_private_ips, vec!["10.0.1.11", "null"]);
    }

    #[test]
    fn test_normalize_clusters_keeps_source_order() {
        let clusters = object(json!({
            "zoe": { "master_public_ip": "1.1.1.1" },
            "adam": "not-an-object",
            "mia": {}
        }));

        let records = normalize_clusters(&clusters);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["zoe", "adam", "mia"]);
        assert_eq!(records[1].master_ip, "N/A");
    }
}
