//! Tool configuration module.
//!
//! Settings live in an optional `config.toml` at the root of a project
//! directory, next to `db.json`. A missing file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [export]
//! dir = "exports/hw"        # Export bundle location, relative to the project
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; an empty file is valid. Unknown keys are rejected
//! to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the config file inside a project directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project-level tool settings loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Export bundle settings.
    pub export: ExportConfig,
}

/// Export bundle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Output directory, relative to the project directory.
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: "exports/hw".to_string(),
        }
    }
}

impl ToolConfig {
    /// Load `config.toml` from a project directory, falling back to defaults
    /// when the file does not exist.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = project_dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: ToolConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dir = self.export.dir.trim();
        if dir.is_empty() {
            return Err(ConfigError::Validation(
                "export.dir must not be empty".into(),
            ));
        }
        if Path::new(dir).is_absolute() {
            return Err(ConfigError::Validation(
                "export.dir must be relative to the project directory".into(),
            ));
        }
        Ok(())
    }

    /// Resolved export directory for a project.
    pub fn export_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.export.dir)
    }
}

/// A stock `config.toml` with every option documented.
pub fn stock_config_toml() -> &'static str {
    r#"# Item World Database configuration
# All options are optional - defaults shown below.

[export]
# Where `item-world-db export` writes database.txt and thumbnails/,
# relative to the project directory.
dir = "exports/hw"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = ToolConfig::load(tmp.path()).unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.export_dir(tmp.path()), tmp.path().join("exports/hw"));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "").unwrap();
        assert_eq!(ToolConfig::load(tmp.path()).unwrap(), ToolConfig::default());
    }

    #[test]
    fn export_dir_override() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[export]\ndir = \"build/engine\"\n",
        )
        .unwrap();
        let config = ToolConfig::load(tmp.path()).unwrap();
        assert_eq!(
            config.export_dir(tmp.path()),
            tmp.path().join("build/engine")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[export]\ndirectory = \"x\"\n",
        )
        .unwrap();
        let err = ToolConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn empty_export_dir_is_invalid() {
        let config = ToolConfig {
            export: ExportConfig { dir: "  ".into() },
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn absolute_export_dir_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let config = ToolConfig {
            export: ExportConfig {
                dir: tmp.path().to_string_lossy().to_string(),
            },
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("relative"));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: ToolConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ToolConfig::default());
        config.validate().unwrap();
    }
}
