//! Configuration file management for Quill.
//!
//! Supports reading secrets from `~/.config/quill/secret.json`.

use crate::error::{QuillError, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Model used when `model_name` is not set in the configuration.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl GeminiConfig {
    /// Returns the configured model name, falling back to
    /// [`DEFAULT_GEMINI_MODEL`].
    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }
}

/// Loads the secret configuration file from ~/.config/quill/secret.json
pub fn load_secret_config() -> Result<SecretConfig> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        return Err(QuillError::config(format!(
            "Configuration file not found at: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        QuillError::config(format!(
            "Failed to read configuration file at {}: {}",
            config_path.display(),
            e
        ))
    })?;

    parse_secret_config(&content, &config_path)
}

fn parse_secret_config(content: &str, path: &std::path::Path) -> Result<SecretConfig> {
    serde_json::from_str(content).map_err(|e| {
        QuillError::config(format!(
            "Failed to parse configuration file at {}: {}",
            path.display(),
            e
        ))
    })
}

/// Returns the path to the configuration file: ~/.config/quill/secret.json
fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| QuillError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("quill").join("secret.json"))
}
