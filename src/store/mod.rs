mod presets;
mod settings;

pub use presets::{Preset, PresetStore};
pub use settings::StoredSettings;

use std::path::{Path, PathBuf};

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.json")
}

pub fn presets_path(config_dir: &Path) -> PathBuf {
    config_dir.join("presets.json")
}
