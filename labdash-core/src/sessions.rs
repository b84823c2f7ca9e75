use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::PathsConfig;

/// Sessions are the descriptor files (`<id>.tfvars`) kept next to the
/// Terraform stack; the file stem is the workspace name.
#[derive(Debug, Clone)]
pub struct SessionDirectory {
    dir: PathBuf,
    suffix: String,
}

impl SessionDirectory {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(paths.sessions_dir(), paths.session_suffix.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Sorted session identifiers. A missing or unreadable directory yields
    /// an empty list.
    pub fn list_sessions(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Sessions directory {} does not exist", self.dir.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "Failed to read sessions directory {}: {}",
                    self.dir.display(),
                    e
                );
                return Vec::new();
            }
        };

        let sessions: BTreeSet<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter_map(|name| self.session_id(&name).map(str::to_string))
            .collect();

        sessions.into_iter().collect()
    }

    fn session_id<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.suffix.as_str())
            .filter(|stem| !stem.is_empty())
    }
}
