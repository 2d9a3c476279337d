use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::CategoryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Partial,
    Blocked,
    Error,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeStatus::Success => "success",
            ProbeStatus::Partial => "partial",
            ProbeStatus::Blocked => "blocked",
            ProbeStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

impl ProbeStatus {
    /// Deterministic classification of a received status code.
    pub fn classify(status: u16) -> Self {
        match status {
            200 | 204 => ProbeStatus::Success,
            400..=499 => ProbeStatus::Blocked,
            _ => ProbeStatus::Partial,
        }
    }
}

/// One record per executed test case. Appended once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub category: CategoryId,
    pub description: String,
    pub payload: String,
    pub status: ProbeStatus,
    pub response_code: Option<u16>,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn classified(
        category: CategoryId,
        description: String,
        payload: String,
        response_code: u16,
        duration_ms: u64,
    ) -> Self {
        Self {
            category,
            description,
            payload,
            status: ProbeStatus::classify(response_code),
            response_code: Some(response_code),
            duration_ms,
            error: None,
            completed_at: Utc::now(),
        }
    }

    pub fn errored(
        category: CategoryId,
        description: String,
        payload: String,
        message: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            category,
            description,
            payload,
            status: ProbeStatus::Error,
            response_code: None,
            duration_ms,
            error: Some(message),
            completed_at: Utc::now(),
        }
    }

    pub fn is_finding(&self) -> bool {
        matches!(self.status, ProbeStatus::Success | ProbeStatus::Partial)
    }
}
