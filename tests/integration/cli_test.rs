#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const CLUSTERS_JSON: &str = r#"{"alice":{"master_public_ip":"54.75.1.10","master_private_ip":"10.0.1.10","worker_public_ips":["54.75.1.11","54.75.1.12"],"worker_private_ips":["10.0.1.11","10.0.1.12"]},"bob":{"master_public_ip":"54.75.2.10"}}"#;

/// A throwaway project root with its own `labdash.toml`, sessions directory
/// and home directory, so nothing from the developer's machine leaks in.
struct Lab {
    root: TempDir,
}

impl Lab {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("terraform")).unwrap();
        std::fs::create_dir_all(root.path().join("sessions")).unwrap();
        std::fs::create_dir_all(root.path().join("home")).unwrap();
        let lab = Self { root };
        lab.write_config("labdash-no-such-terraform", &[]);
        lab
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn add_session(&self, name: &str) {
        std::fs::write(
            self.path().join("sessions").join(format!("{}.tfvars", name)),
            "participants = []\n",
        )
        .unwrap();
    }

    fn write_config(&self, binary: &str, prefix_args: &[String]) {
        let prefix = prefix_args
            .iter()
            .map(|a| format!("\"{}\"", a))
            .collect::<Vec<_>>()
            .join(", ");
        let config = format!(
            "[paths]\nproject_root = \"{}\"\n\n[terraform]\nbinary = \"{}\"\nprefix_args = [{}]\ncommand_timeout_secs = 2\nclusters_timeout_secs = 2\n",
            self.path().display(),
            binary,
            prefix
        );
        std::fs::write(self.path().join("labdash.toml"), config).unwrap();
    }

    /// Points the config at a shell script standing in for terraform.
    fn fake_terraform(&self, body: &str) {
        let script = self.path().join("fake-terraform.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        self.write_config("sh", &[script.display().to_string()]);
    }

    fn run(&self, args: &[&str]) -> Output {
        let home = self.path().join("home");
        Command::new(env!("CARGO_BIN_EXE_labdash"))
            .args(args)
            .current_dir(self.path())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("LABDASH_PROJECT_ROOT")
            .env_remove("LABDASH_TERRAFORM_DIR")
            .env_remove("LABDASH_SESSIONS_DIR")
            .env_remove("LABDASH_LOG_LEVEL")
            .output()
            .expect("Failed to execute labdash")
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "labdash {:?} failed: {}",
            args,
            stderr_to_string(&output)
        );
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
    }
}

fn stdout_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn healthy_terraform(lab: &Lab) {
    lab.fake_terraform(&format!(
        r#"case "$1 $2" in
  "workspace show") echo lab-spring ;;
  "workspace select") exit 0 ;;
  "output -json")
    case "$3" in
      clusters) echo '{}' ;;
      instance_type_master) echo '"t3.large"' ;;
      *) echo "No outputs found" >&2; exit 1 ;;
    esac ;;
  *) exit 2 ;;
esac"#,
        CLUSTERS_JSON
    ));
}

mod version_command_tests {
    use super::*;

    #[test]
    fn test_version_command_basic() {
        let lab = Lab::new();
        let output = lab.run(&["version"]);
        let stdout = stdout_to_string(&output);

        assert!(output.status.success(), "version command should succeed");
        assert!(stdout.contains("labdash"));
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_version_command_detailed() {
        let lab = Lab::new();
        let output = lab.run(&["version", "--detailed"]);
        let stdout = stdout_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("Version"));
        assert!(stdout.contains("Apache-2.0"));
        assert!(stdout.contains("t3.medium"));
    }
}

mod health_command_tests {
    use super::*;

    #[test]
    fn test_health_json() {
        let lab = Lab::new();
        let json = lab.run_json(&["health"]);

        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
    }
}

mod sessions_command_tests {
    use super::*;

    #[test]
    fn test_sessions_sorted_json() {
        let lab = Lab::new();
        lab.add_session("workshop-b");
        lab.add_session("workshop-a");
        std::fs::write(lab.path().join("sessions").join("notes.txt"), "x").unwrap();

        let json = lab.run_json(&["sessions", "--format", "json"]);

        assert_eq!(json["sessions"], serde_json::json!(["workshop-a", "workshop-b"]));
        assert!(json["current"].is_null());
    }

    #[test]
    fn test_sessions_marks_active_workspace() {
        let lab = Lab::new();
        lab.add_session("lab-spring");
        healthy_terraform(&lab);

        let json = lab.run_json(&["sessions", "--format", "json"]);
        assert_eq!(json["current"], "lab-spring");

        let output = lab.run(&["sessions"]);
        let stdout = stdout_to_string(&output);
        assert!(output.status.success());
        assert!(stdout.contains("lab-spring"));
        assert!(stdout.contains("active"));
    }

    #[test]
    fn test_sessions_empty_text() {
        let lab = Lab::new();
        let output = lab.run(&["sessions"]);

        assert!(output.status.success());
        assert!(stdout_to_string(&output).contains("No *.tfvars sessions found"));
    }

    #[test]
    fn test_sessions_missing_directory() {
        let lab = Lab::new();
        std::fs::remove_dir(lab.path().join("sessions")).unwrap();

        let json = lab.run_json(&["sessions", "--format", "json"]);
        assert_eq!(json["sessions"], serde_json::json!([]));
    }
}

mod snapshot_command_tests {
    use super::*;

    #[test]
    fn test_snapshot_json() {
        let lab = Lab::new();
        healthy_terraform(&lab);

        let json = lab.run_json(&["snapshot", "--format", "json"]);

        assert_eq!(json["session"], "lab-spring");
        assert_eq!(json["participant_count"], 2);
        assert!(json.get("error").is_none());

        let names: Vec<&str> = json["participants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);

        let bob = &json["participants"][1];
        assert_eq!(bob["master_ip"], "54.75.2.10");
        assert_eq!(bob["master_private_ip"], "N/A");
        assert_eq!(bob["worker_count"], 0);
        assert_eq!(bob["ssh_command"], "ssh ubuntu@54.75.2.10");

        let breakdown = &json["cost"]["breakdown"];
        assert_eq!(breakdown["master_instance_type"], "t3.large");
        assert_eq!(breakdown["worker_instance_type"], "t3.small");
        assert_eq!(breakdown["clusters"], 2);
        assert_eq!(breakdown["storage_gb"], 140);
    }

    #[test]
    fn test_snapshot_without_cost() {
        let lab = Lab::new();
        healthy_terraform(&lab);

        let json = lab.run_json(&["snapshot", "--no-cost", "--format", "json"]);

        assert!(json.get("cost").is_none());
        assert_eq!(json["participant_count"], 2);
    }

    #[test]
    fn test_snapshot_text() {
        let lab = Lab::new();
        healthy_terraform(&lab);

        let output = lab.run(&["snapshot"]);
        let stdout = stdout_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("lab-spring"));
        assert!(stdout.contains("alice"));
        assert!(stdout.contains("ssh ubuntu@54.75.1.10"));
        assert!(stdout.contains("Total"));
    }

    #[test]
    fn test_snapshot_degrades_without_terraform() {
        let lab = Lab::new();

        let json = lab.run_json(&["snapshot", "--format", "json"]);

        assert!(json["session"].is_null());
        assert_eq!(json["participant_count"], 0);
        assert_eq!(json["participants"], serde_json::json!([]));
        assert_eq!(json["cost"]["total_hourly"], 0.0);
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("Unexpected error:"), "got {}", error);
    }

    #[test]
    fn test_degraded_snapshot_shows_suggestion() {
        let lab = Lab::new();

        let output = lab.run(&["snapshot"]);
        let stdout = stdout_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("Unexpected error:"));
        assert!(stdout.contains("Suggestion:"));
        assert!(stdout.contains("terraform.binary"));

        let output = lab.run(&["cost"]);
        assert!(stdout_to_string(&output).contains("terraform.binary"));
    }

    #[test]
    fn test_snapshot_reports_failed_output() {
        let lab = Lab::new();
        lab.fake_terraform(
            r#"case "$1 $2" in
  "workspace show") echo lab-autumn ;;
  *) echo "state locked" >&2; exit 1 ;;
esac"#,
        );

        let json = lab.run_json(&["snapshot", "--format", "json"]);

        assert_eq!(json["session"], "lab-autumn");
        assert_eq!(json["error"], "Failed to get Terraform output");
        assert_eq!(json["cost"]["total_hourly"], 0.0);
    }
}

mod cost_command_tests {
    use super::*;

    #[test]
    fn test_cost_json() {
        let lab = Lab::new();
        healthy_terraform(&lab);

        let json = lab.run_json(&["cost", "--format", "json"]);

        assert_eq!(json["session"], "lab-spring");
        assert!(json["cost"]["total_hourly"].as_f64().unwrap() > 0.0);
        assert!(json.get("participants").is_none());
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_invalid_config_fails() {
        let lab = Lab::new();
        std::fs::write(
            lab.path().join("labdash.toml"),
            "[terraform]\ncommand_timeout_secs = 0\n",
        )
        .unwrap();

        let output = lab.run(&["sessions"]);

        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("Error"));
    }

    #[test]
    fn test_config_command_prints_toml() {
        let lab = Lab::new();
        let output = lab.run(&["config"]);
        let stdout = stdout_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("[terraform]"));
        assert!(stdout.contains("labdash-no-such-terraform"));
    }

    #[test]
    fn test_sessions_dir_override() {
        let lab = Lab::new();
        let other = TempDir::new().unwrap();
        std::fs::write(other.path().join("elsewhere.tfvars"), "").unwrap();

        let output = Command::new(env!("CARGO_BIN_EXE_labdash"))
            .args(["sessions", "--format", "json"])
            .current_dir(lab.path())
            .env("HOME", lab.path().join("home"))
            .env("XDG_CONFIG_HOME", lab.path().join("home").join(".config"))
            .env("LABDASH_SESSIONS_DIR", other.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute labdash");

        assert!(output.status.success());
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["sessions"], serde_json::json!(["elsewhere"]));
    }
}
