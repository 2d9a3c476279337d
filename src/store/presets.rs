use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ProbeError;
use crate::probe::validate_target;

/// A saved target. `target_url` is validated on create, so a listed preset
/// can always start a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: u64,
    pub name: String,
    pub target_url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetFile {
    next_id: u64,
    presets: Vec<Preset>,
}

pub struct PresetStore {
    path: PathBuf,
    file: PresetFile,
}

impl PresetStore {
    pub fn load(path: &Path) -> Result<Self> {
        let file = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            PresetFile {
                next_id: 1,
                presets: Vec::new(),
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn list(&self) -> &[Preset] {
        &self.file.presets
    }

    pub fn create(&mut self, name: &str, target_url: &str) -> Result<&Preset> {
        validate_target(target_url)
            .map_err(|_| ProbeError::InvalidUrl(target_url.to_string()))?;

        let preset = Preset {
            id: self.file.next_id,
            name: name.to_string(),
            target_url: target_url.to_string(),
        };
        self.file.next_id += 1;
        self.file.presets.push(preset);
        self.save()?;
        Ok(self.file.presets.last().expect("just pushed"))
    }

    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let before = self.file.presets.len();
        self.file.presets.retain(|p| p.id != id);
        let removed = self.file.presets.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.file.presets.iter().find(|p| p.name == name)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.file)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
