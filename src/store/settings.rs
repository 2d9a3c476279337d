use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::catalog::CategoryId;
use crate::models::RunSettings;

/// Persisted defaults, loaded from a JSON file in the config directory.
/// Missing file or missing fields fall back to defaults so upgrades never
/// break an existing install.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredSettings {
    pub request_delay_ms: u64,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_secs: u64,
    #[serde(rename = "concurrencyHint")]
    pub concurrency: usize,
    pub verbose_log: bool,
    pub auto_export: bool,
    #[serde(rename = "defaultCategorySelection")]
    pub default_categories: HashMap<CategoryId, bool>,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            request_delay_ms: 500,
            timeout_secs: 10,
            concurrency: 1,
            verbose_log: false,
            auto_export: false,
            default_categories: HashMap::new(),
        }
    }
}

impl StoredSettings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Categories enabled by default, in canonical catalogue order. A
    /// category absent from the map counts as enabled.
    pub fn selected_categories(&self) -> Vec<CategoryId> {
        CategoryId::ALL
            .iter()
            .copied()
            .filter(|id| *self.default_categories.get(id).unwrap_or(&true))
            .collect()
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            delay_ms: self.request_delay_ms,
            timeout_secs: self.timeout_secs,
            concurrency: self.concurrency.max(1),
            verbose: self.verbose_log,
            auto_export: self.auto_export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = StoredSettings::load(Path::new("/nonexistent/probekit.json")).unwrap();
        assert_eq!(settings.request_delay_ms, 500);
        assert_eq!(settings.selected_categories(), CategoryId::ALL.to_vec());
    }

    #[test]
    fn test_roundtrip_through_disk() {
        let dir = std::env::temp_dir().join("probekit-settings-test");
        let path = dir.join("settings.json");
        let _ = fs::remove_dir_all(&dir);

        let mut settings = StoredSettings::default();
        settings.timeout_secs = 3;
        settings.default_categories.insert(CategoryId::Race, false);
        settings.save(&path).unwrap();

        let loaded = StoredSettings::load(&path).unwrap();
        assert_eq!(loaded.timeout_secs, 3);
        assert!(!loaded.selected_categories().contains(&CategoryId::Race));
        assert!(loaded.selected_categories().contains(&CategoryId::Header));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_persisted_field_names() {
        let value = serde_json::to_value(StoredSettings::default()).unwrap();
        for key in [
            "requestDelayMs",
            "timeoutSeconds",
            "concurrencyHint",
            "verboseLog",
            "autoExport",
            "defaultCategorySelection",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_concurrency_floor() {
        let settings = StoredSettings {
            concurrency: 0,
            ..StoredSettings::default()
        };
        assert_eq!(settings.run_settings().concurrency, 1);
    }
}
