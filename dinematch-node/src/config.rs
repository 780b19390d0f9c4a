use std::{fs, path::Path};

use dinematch_common::error::{DineError, Result};
use serde::{Deserialize, Serialize};

use crate::places::DEFAULT_BASE_URL;

/// Environment variable that takes precedence over `places_api_key`.
pub const API_KEY_ENV: &str = "DINEMATCH_PLACES_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub port: u16,
    #[serde(default)]
    pub places_api_key: String,
    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,
    /// Directory `/saveList` writes consensus exports to.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_places_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_export_dir() -> String {
    "data/exports".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            port: 8080,
            places_api_key: String::new(),
            places_base_url: default_places_base_url(),
            export_dir: default_export_dir(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DineError::Config(format!("encode config: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        serde_json::from_str::<Config>(&data)
            .map_err(|e| DineError::Config(format!("{}: {e}", path.as_ref().display())))
    }

    /// Applies `DINEMATCH_PLACES_API_KEY` when it is set and not empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.places_api_key = key;
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }
}
