//! Configuration management for zsh-warrior.
//!
//! Configuration comes from environment variables only. Every field has a
//! default, so loading never fails.

use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{info, warn};

/// Ollama base URL.
pub const ENDPOINT_VAR: &str = "ZSH_WARRIOR_ENDPOINT";
/// Model identifier passed to Ollama.
pub const MODEL_VAR: &str = "ZSH_WARRIOR_MODEL";
/// Sampling temperature.
pub const TEMPERATURE_VAR: &str = "ZSH_WARRIOR_TEMP";
/// Optional log file path.
pub const LOGFILE_VAR: &str = "ZSH_WARRIOR_LOGFILE";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen2.5-coder:3b";
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Settings for a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Ollama host URL (default: http://localhost:11434).
    pub endpoint: String,
    /// Model name (default: qwen2.5-coder:3b).
    pub model: String,
    /// Sampling temperature, passed through unchecked.
    pub temperature: f64,
    /// Not read from the environment and not consulted anywhere yet.
    pub logging_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            logging_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let endpoint = lookup(ENDPOINT_VAR).unwrap_or(defaults.endpoint);
        let model = lookup(MODEL_VAR).unwrap_or(defaults.model);
        let temperature = match lookup(TEMPERATURE_VAR) {
            Some(raw) => parse_temperature(&raw).unwrap_or_else(|| {
                warn!(
                    "Invalid {}='{}'. Falling back to default ({}).",
                    TEMPERATURE_VAR, raw, DEFAULT_TEMPERATURE
                );
                DEFAULT_TEMPERATURE
            }),
            None => DEFAULT_TEMPERATURE,
        };

        let config = Self {
            endpoint,
            model,
            temperature,
            logging_enabled: defaults.logging_enabled,
        };

        info!(
            "Config loaded: endpoint={}, model={}, temperature={}",
            config.endpoint, config.model, config.temperature
        );
        config
    }
}

fn parse_temperature(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Get the log file path, if one is configured.
pub fn log_file() -> Option<PathBuf> {
    log_file_from(std::env::var_os(LOGFILE_VAR))
}

fn log_file_from(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}
