use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CostBreakdown, ParticipantRecord};

/// A complete, timestamped read of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Workspace that was active when the outputs were read.
    pub session: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub participant_count: usize,
    pub participants: Vec<ParticipantRecord>,
    pub cost: CostBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Operator hint for `error`; shown by terminal output only.
    #[serde(skip)]
    pub suggestion: Option<String>,
}

impl SessionSnapshot {
    pub fn new(
        session: Option<String>,
        participants: Vec<ParticipantRecord>,
        cost: CostBreakdown,
    ) -> Self {
        Self {
            session,
            timestamp: Utc::now(),
            participant_count: participants.len(),
            participants,
            cost,
            error: None,
            suggestion: None,
        }
    }

    /// A snapshot that still renders: no participants, zero cost, and the
    /// reason in `error`.
    pub fn failed(session: Option<String>, error: impl Into<String>) -> Self {
        Self {
            session,
            timestamp: Utc::now(),
            participant_count: 0,
            participants: Vec::new(),
            cost: CostBreakdown::zeroed(),
            error: Some(error.into()),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<&str>) -> Self {
        self.suggestion = suggestion.map(str::to_string);
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// JSON body with only the selected fields.
    pub fn to_json_value(&self, fields: SnapshotFields) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if !fields.include_cost {
            if let Value::Object(map) = &mut value {
                map.remove("cost");
            }
        }
        Ok(value)
    }
}

/// Which optional parts of a snapshot a presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotFields {
    pub include_cost: bool,
}

impl Default for SnapshotFields {
    fn default() -> Self {
        Self { include_cost: true }
    }
}

impl SnapshotFields {
    pub fn without_cost() -> Self {
        Self {
            include_cost: false,
        }
    }
}

/// Sessions on disk plus the workspace Terraform currently has selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionListing {
    pub sessions: Vec<String>,
    pub current: Option<String>,
}

impl SessionListing {
    pub fn is_current(&self, session: &str) -> bool {
        self.current.as_deref() == Some(session)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub session: Option<String>,
    pub cost: CostBreakdown,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub suggestion: Option<String>,
}

impl From<SessionSnapshot> for CostReport {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            session: snapshot.session,
            cost: snapshot.cost,
            timestamp: snapshot.timestamp,
            error: snapshot.error,
            suggestion: snapshot.suggestion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
        }
    }
}
