use serde::{Deserialize, Serialize};

use crate::catalog::CategoryId;

/// Per-run knobs. `concurrency == 1` keeps the sequential ordering guarantee;
/// anything higher opts into the bounded fan-out mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub verbose: bool,
    pub auto_export: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            timeout_secs: 10,
            concurrency: 1,
            verbose: false,
            auto_export: false,
        }
    }
}

/// Immutable for the lifetime of the run it starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub target: String,
    pub categories: Vec<CategoryId>,
    pub settings: RunSettings,
}

impl RunConfig {
    pub fn new(target: impl Into<String>, categories: Vec<CategoryId>) -> Self {
        Self {
            target: target.into(),
            categories,
            settings: RunSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }
}
