//! # Generator Settings
//!
//! Optional `tdnc.toml` controlling where artifacts are written:
//!
//! ```toml
//! output_dir = "custom_nodes/td_nodes"
//! registry_path = "custom_nodes/td_nodes/__init__.py"
//! display_suffix = " Node"
//! ```

use crate::error::{GenerationError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const REGISTRY_FILE: &str = "__init__.py";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Directory receiving the config and node artifacts
    pub output_dir: PathBuf,
    /// Registry file; `<output_dir>/__init__.py` when unset
    pub registry_path: Option<PathBuf>,
    /// Appended to the class name to form the display name
    pub display_suffix: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            registry_path: None,
            display_suffix: " Node".to_string(),
        }
    }
}

impl GeneratorSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenerationError::io(path, e))?;
        Self::from_toml(&text).map_err(|message| GenerationError::Settings {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join(REGISTRY_FILE))
    }

    pub fn display_name(&self, class_name: &str) -> String {
        format!("{}{}", class_name, self.display_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_next_to_registry() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.registry_path(), PathBuf::from("./__init__.py"));
        assert_eq!(settings.display_name("TOP_flip"), "TOP_flip Node");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = GeneratorSettings::from_toml("output_dir = \"nodes\"").unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("nodes"));
        assert_eq!(settings.registry_path(), PathBuf::from("nodes/__init__.py"));
        assert_eq!(settings.display_suffix, " Node");
    }

    #[test]
    fn explicit_registry_path_wins() {
        let settings = GeneratorSettings::from_toml(
            "output_dir = \"nodes\"\nregistry_path = \"pkg/__init__.py\"\ndisplay_suffix = \"\"",
        )
        .unwrap();
        assert_eq!(settings.registry_path(), PathBuf::from("pkg/__init__.py"));
        assert_eq!(settings.display_name("blur"), "blur");
    }

    #[test]
    fn malformed_settings_report_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tdnc.toml");
        std::fs::write(&path, "output_dir = [").unwrap();

        let err = GeneratorSettings::load(&path).unwrap_err();
        assert!(matches!(err, GenerationError::Settings { .. }));
        assert!(err.to_string().contains("tdnc.toml"));
    }
}
