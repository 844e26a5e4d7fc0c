//! Configuration module - portal settings and agent endpoints
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.agent-portal/config.json
//! - `.env` and environment overrides for the landing page titles
//! - Default values for all settings
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, ChatConfig, AgentConfig, etc.)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use types::{AgentConfig, CatalogueConfig, ChatConfig, Config};

pub use loader::{config_path, load_config, load_config_from_path, parse_config};

#[cfg(test)]
use defaults::{
    DEFAULT_CHAT_TIMEOUT_SECS, DEFAULT_EXCLUDED_FILES, DEFAULT_PAGES_DIR, DEFAULT_PAGE_TITLE,
    DEFAULT_SEPARATOR, DEFAULT_TITLE, DEFAULT_TYPEWRITER_SPEED,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
