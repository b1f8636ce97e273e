use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use super::ConfigData;
use crate::error::{AnnixResult, ConfigError, ErrorContext};
use crate::storage::AtomicFile;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ANNIX_CONFIG";
pub const FILE_ENV: &str = "ANNIX_FILE";
pub const REBUILD_ENV: &str = "ANNIX_REBUILD_COMMAND";
pub const SEARCH_ENV: &str = "ANNIX_SEARCH_COMMAND";

pub const KEYS: [&str; 5] = ["file", "rebuild_command", "search_command", "auto_sync", "indent"];

#[derive(Debug, Clone)]
pub struct Config {
    pub data: ConfigData,
    pub path: PathBuf,
}

impl Config {
    /// Load from the default location and apply `ANNIX_*` overrides
    pub fn load() -> AnnixResult<Self> {
        let mut config = Self::load_or_default(Self::default_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// `$ANNIX_CONFIG`, else `config.toml` in the platform config directory
    pub fn default_path() -> AnnixResult<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "annix").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> AnnixResult<Self> {
        let path = path.as_ref();

        let data: ConfigData = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content).map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            ConfigData::default()
        };

        Ok(Self {
            data,
            path: path.to_path_buf(),
        })
    }

    /// Apply environment-style overrides; `lookup` returns the variable's value
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AnnixResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = lookup(FILE_ENV) {
            self.data.file = PathBuf::from(file);
        }
        if let Some(command) = lookup(REBUILD_ENV) {
            self.data.rebuild_command = split_command(REBUILD_ENV, &command)?;
        }
        if let Some(command) = lookup(SEARCH_ENV) {
            self.data.search_command = split_command(SEARCH_ENV, &command)?;
        }
        Ok(())
    }

    pub fn save(&self) -> AnnixResult<()> {
        let content = toml::to_string_pretty(&self.data).map_err(|e| ConfigError::Invalid {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        AtomicFile::new(&self.path)?.write(content.as_bytes())
    }

    pub fn set(&mut self, key: &str, value: &str) -> AnnixResult<()> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "file" => self.data.file = PathBuf::from(value),
            "rebuild_command" => self.data.rebuild_command = split_command(key, value)?,
            "search_command" => self.data.search_command = split_command(key, value)?,
            "auto_sync" => self.data.auto_sync = value.parse().map_err(|_| invalid())?,
            "indent" => {
                if !value.chars().all(|c| c == ' ' || c == '\t') {
                    return Err(invalid().into());
                }
                self.data.indent = value.to_string();
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into())
            }
        }

        self.save()
    }

    pub fn get(&self, key: &str) -> AnnixResult<String> {
        let value = match key {
            "file" => self.data.file.display().to_string(),
            "rebuild_command" => shell_words::join(&self.data.rebuild_command),
            "search_command" => shell_words::join(&self.data.search_command),
            "auto_sync" => self.data.auto_sync.to_string(),
            "indent" => format!("{:?}", self.data.indent),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into())
            }
        };

        Ok(value)
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: ConfigData::default(),
            path: PathBuf::from("config.toml"),
        }
    }
}

fn split_command(key: &str, value: &str) -> AnnixResult<Vec<String>> {
    let words = shell_words::split(value).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })?;
    if words.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into());
    }
    Ok(words)
}
