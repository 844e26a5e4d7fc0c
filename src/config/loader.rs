//! Configuration loading from file system
//!
//! Reads `~/.agent-portal/config.json` and layers `.env` / process
//! environment overrides on top.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use super::types::Config;

/// Path of the config file: `$AGENT_PORTAL_CONFIG` or ~/.agent-portal/config.json
pub fn config_path() -> PathBuf {
    let raw = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}

/// Load configuration from the default location.
///
/// This function:
/// 1. Loads `.env` from the working directory if present
/// 2. Parses the JSON config file
/// 3. Applies `PAGE_TITLE` / `TITLE` environment overrides
///
/// Returns Config::default() (plus overrides) if the file is missing or invalid.
pub fn load_config() -> Config {
    load_config_from_path(&config_path())
}

/// Load configuration from a specific file path.
#[instrument(name = "load_config", skip_all, fields(path = %config_path.display()))]
pub fn load_config_from_path(config_path: &Path) -> Config {
    match dotenvy::dotenv() {
        Ok(env_path) => debug!(path = %env_path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Failed to load .env file"),
    }

    let mut config = read_config_file(config_path);
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config
}

fn read_config_file(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                error = %e,
                path = %config_path.display(),
                "Failed to read config file, using defaults"
            );
            return Config::default();
        }
    };

    match parse_config(&content) {
        Ok(config) => {
            info!(path = %config_path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            let error_hint = if e.to_string().contains("missing field `url`") {
                "\n\nHint: every entry under 'agents' needs a 'url'. Example:\n\
                \"agents\": {\n\
                  \"2_🤓_Expert_Support.py\": {\n\
                    \"url\": \"https://example.com/agent\",\n\
                    \"bearerTokenEnv\": \"EXPERT_AGENT_TOKEN\"\n\
                  }\n\
                }"
            } else {
                ""
            };

            warn!(
                error = %e,
                hint = %error_hint,
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}

/// Parse a config document
pub fn parse_config(content: &str) -> serde_json::Result<Config> {
    serde_json::from_str::<Config>(content)
}
