//! # CLI Configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file
//! (`promptitron.yml` or the `--config` path), then `PROMPTITRON_*`
//! environment variables.

use anyhow::{bail, Result};
use ::config::{Config as ConfigBuilder, Environment, File, FileFormat};
use promptitron::constants::DEFAULT_API_URL;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "promptitron.yml";

/// The resolved CLI configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Backend base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Directory or `http(s)://` base holding the subject JSON files.
    #[serde(default = "default_curriculum_source")]
    pub curriculum_source: String,
    /// File backing the selection handoff slot.
    #[serde(default = "default_session_file")]
    pub session_file: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_curriculum_source() -> String {
    "kazanimlar".to_string()
}

fn default_session_file() -> String {
    ".promptitron_session.json".to_string()
}

fn default_log_file() -> String {
    "promptitron-cli.log".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Loads the configuration.
///
/// An explicit `config_path` must exist; the default `promptitron.yml` is
/// optional.
pub fn get_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = ConfigBuilder::builder();

    match config_path {
        Some(path) => {
            if !Path::new(path).exists() {
                bail!("Configuration file not found: {path}");
            }
            info!("Loading configuration from: {}", path);
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        }
        None => {
            builder = builder
                .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));
        }
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("PROMPTITRON")
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
