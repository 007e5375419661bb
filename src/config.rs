use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_WINDOW_SIZE: [f32; 2] = [1024.0, 768.0];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub data_file: Option<String>,
    #[serde(default)]
    pub debug: bool,
    pub window_size: Option<[f32; 2]>,
}

impl Config {
    pub fn app_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".workout-manager"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Config::load path={}", path.display());
        if !path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        debug!(
            "Config loaded: data_file={:?}, debug={}, window_size={:?}",
            config.data_file, config.debug, config.window_size
        );
        Ok(config)
    }

    /// Where the key-value storage file lives.
    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(file) => Ok(expand_tilde(file)),
            None => Ok(Self::app_dir()?.join("storage.json")),
        }
    }

    pub fn effective_window_size(&self) -> [f32; 2] {
        self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE)
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
