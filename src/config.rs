//! User configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::export::render::DEFAULT_WIDTH;
use crate::store::file::DEFAULT_STORE_FILE;
use crate::store::Backend;

const APP_NAME: &str = "today-reminders";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub wrap: bool,

    #[serde(default = "default_width", deserialize_with = "deserialize_width")]
    pub width: usize,

    /// Directory the report is written to; the working directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            wrap: true,
            width: DEFAULT_WIDTH,
            output_dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_width() -> usize {
    DEFAULT_WIDTH
}

fn deserialize_width<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let width = usize::deserialize(deserializer)?;
    if width == 0 {
        return Err(serde::de::Error::custom("width must be at least 1"));
    }
    Ok(width)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,

    /// JSON store location; `<app dir>/reminders.json` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(p) => Ok(expand_home(p)),
            None => Ok(get_app_dir()?.join(DEFAULT_STORE_FILE)),
        }
    }
}

impl ExportConfig {
    pub fn resolved_output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_deref().map(expand_home)
    }
}

fn expand_home(s: &str) -> PathBuf {
    if let Some(stripped) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(s)
}

/// Application data directory: `$XDG_CONFIG_HOME/today-reminders` on Linux,
/// `~/.today-reminders` elsewhere.
pub fn get_app_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let base = dirs::config_dir().context("Cannot find config directory")?;
        Ok(base.join(APP_NAME))
    }

    #[cfg(not(target_os = "linux"))]
    {
        let home = dirs::home_dir().context("Cannot find home directory")?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }
}

fn config_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join("config.toml"))
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or
    /// unreadable. A bad config never stops an export.
    pub fn load() -> Self {
        match load_config() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring config file: {:#}", e);
                eprintln!("Warning: ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }
}

pub fn load_config() -> Result<Option<Config>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Invalid config in {:?}", path))?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn set_temp_home(path: &std::path::Path) {
        std::env::set_var("HOME", path);
        std::env::set_var("XDG_CONFIG_HOME", path.join(".config"));
    }

    fn write_config(content: &str) -> Result<()> {
        let path = config_path()?;
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, content)?;
        Ok(())
    }

    #[test]
    fn test_config_deserialize_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.export.wrap);
        assert_eq!(config.export.width, 80);
        assert!(config.export.output_dir.is_none());
        assert_eq!(config.store.backend, Backend::Auto);
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_config_nested_sections() {
        let toml = r#"
            [export]
            wrap = false
            width = 100
            output_dir = "/tmp/reports"

            [store]
            backend = "file"
            path = "/data/reminders.json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.export.wrap);
        assert_eq!(config.export.width, 100);
        assert_eq!(
            config.export.resolved_output_dir(),
            Some(PathBuf::from("/tmp/reports"))
        );
        assert_eq!(config.store.backend, Backend::File);
        assert_eq!(
            config.store.resolved_path().unwrap(),
            PathBuf::from("/data/reminders.json")
        );
    }

    #[test]
    fn test_export_config_partial_deserialize() {
        let export: ExportConfig = toml::from_str("width = 60").unwrap();
        assert!(export.wrap);
        assert_eq!(export.width, 60);
    }

    #[test]
    #[serial]
    fn test_load_without_file_gives_defaults() -> Result<()> {
        let temp = tempdir()?;
        set_temp_home(temp.path());

        assert!(load_config()?.is_none());
        let config = Config::load();
        assert!(config.export.wrap);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_load_reads_config_file() -> Result<()> {
        let temp = tempdir()?;
        set_temp_home(temp.path());

        write_config("[export]\nwidth = 72\n\n[store]\nbackend = \"file\"\n")?;

        let loaded = Config::load();
        assert_eq!(loaded.export.width, 72);
        assert_eq!(loaded.store.backend, Backend::File);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_default_store_path_lives_in_app_dir() -> Result<()> {
        let temp = tempdir()?;
        set_temp_home(temp.path());

        let path = StoreConfig::default().resolved_path()?;
        assert!(path.starts_with(get_app_dir()?));
        assert!(path.ends_with("reminders.json"));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_invalid_config_falls_back_to_defaults() -> Result<()> {
        let temp = tempdir()?;
        set_temp_home(temp.path());

        write_config("[export]\nwidth = \"wide\"\n\n[store]\nbackend = \"file\"\n")?;

        assert!(load_config().is_err());
        let config = Config::load();
        assert_eq!(config.export.width, DEFAULT_WIDTH);
        assert_eq!(config.store.backend, Backend::Auto);
        Ok(())
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let result: std::result::Result<ExportConfig, _> = toml::from_str("width = 0");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("width must be at least 1"));

        let export: ExportConfig = toml::from_str("width = 1").unwrap();
        assert_eq!(export.width, 1);
    }
}
