use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ProbeResult, ProbeStatus};
use crate::catalog::CategoryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
        };
        write!(f, "{}", s)
    }
}

/// A probe that came back `success` or `partial`, surfaced as a potential
/// weakness. Success means the probe went through unchallenged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: CategoryId,
    pub description: String,
    pub payload: String,
    pub response_code: Option<u16>,
}

impl Finding {
    pub fn from_result(result: &ProbeResult) -> Option<Self> {
        if !result.is_finding() {
            return None;
        }
        let severity = match result.status {
            ProbeStatus::Success => Severity::High,
            _ => Severity::Medium,
        };
        Some(Self {
            severity,
            category: result.category,
            description: result.description.clone(),
            payload: result.payload.clone(),
            response_code: result.response_code,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub success: usize,
    pub partial: usize,
    pub blocked: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ProbeStatus) {
        match status {
            ProbeStatus::Success => self.success += 1,
            ProbeStatus::Partial => self.partial += 1,
            ProbeStatus::Blocked => self.blocked += 1,
            ProbeStatus::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.partial + self.blocked + self.error
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: CategoryId,
    pub counts: StatusCounts,
}

/// Pure projection over a result sequence; recomputed on demand, never
/// persisted apart from the results it summarizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub counts: StatusCounts,
    pub per_category: Vec<CategoryBreakdown>,
    pub findings: Vec<Finding>,
}

impl RunSummary {
    pub fn empty() -> Self {
        Self {
            total: 0,
            counts: StatusCounts::default(),
            per_category: Vec::new(),
            findings: Vec::new(),
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.counts.success as f64 / self.total as f64
        }
    }
}
