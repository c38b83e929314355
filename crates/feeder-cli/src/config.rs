//! Configuration loaded from ~/.feeder/config.toml

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use feeder_io::WriterOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FeederConfig {
    #[serde(default)]
    pub writer: WriterConfig,
    #[serde(default)]
    pub sign: SignConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriterConfig {
    /// One level of indentation inside object blocks
    #[serde(default = "default_indent")]
    pub indent: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

fn default_indent() -> String {
    "\t".to_string()
}

/// Signature block written by `transform`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignConfig {
    #[serde(default = "default_sign_enabled")]
    pub enabled: bool,
    #[serde(default = "default_tool")]
    pub tool: String,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            enabled: default_sign_enabled(),
            tool: default_tool(),
        }
    }
}

fn default_sign_enabled() -> bool {
    true
}

fn default_tool() -> String {
    "feeder".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl FeederConfig {
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            indent: self.writer.indent.clone(),
        }
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(&self.logging.level)
            .map_err(|_| anyhow!("invalid log level `{}` in config", self.logging.level))
    }
}

/// Location: ~/.feeder/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(".feeder").join("config.toml"))
}

/// Load the configuration from `path`, or from the default location.
/// A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<FeederConfig> {
    let location = match path {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };

    if !location.exists() {
        return Ok(FeederConfig::default());
    }

    let contents = std::fs::read_to_string(&location)
        .with_context(|| format!("reading {}", location.display()))?;
    let config: FeederConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing {}", location.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, FeederConfig::default());
        assert_eq!(config.writer_options(), WriterOptions::default());
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert!(config.sign.enabled);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config: FeederConfig = toml::from_str(
            r#"
            [writer]
            indent = "    "

            [sign]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.writer.indent, "    ");
        assert!(!config.sign.enabled);
        assert_eq!(config.sign.tool, "feeder");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn bad_level_is_reported() {
        let mut config = FeederConfig::default();
        config.logging.level = "loud".into();
        assert!(config.log_level().is_err());
    }
}
