//! Configuration type definitions
//!
//! This module contains all the struct definitions for configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;

// ============================================
// CATALOGUE CONFIG
// ============================================

/// How demo page filenames are recognised and decomposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueConfig {
    /// Separator between ordinal, icon and title words (default: '_')
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Recognised page extensions without the dot (default: ["py"])
    #[serde(default = "default_page_extensions")]
    pub extensions: Vec<String>,
    /// Filenames that are never catalogued (default: ["__init__.py"])
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}
fn default_page_extensions() -> Vec<String> {
    DEFAULT_PAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}
fn default_excluded_files() -> Vec<String> {
    DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect()
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        CatalogueConfig {
            separator: DEFAULT_SEPARATOR,
            extensions: default_page_extensions(),
            excluded_files: default_excluded_files(),
        }
    }
}

// ============================================
// CHAT CONFIG
// ============================================

/// Settings shared by every agent page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    /// Request timeout in seconds (default: 300)
    #[serde(default = "default_chat_timeout_secs")]
    pub timeout_secs: u64,
    /// Words revealed per second by the typewriter; 0 prints instantly (default: 10)
    #[serde(default = "default_typewriter_speed")]
    pub typewriter_speed: u32,
    /// Verify TLS certificates of agent endpoints (default: false)
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Where chat history is kept between invocations (default: ~/.agent-portal/sessions.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<String>,
}

fn default_chat_timeout_secs() -> u64 {
    DEFAULT_CHAT_TIMEOUT_SECS
}
fn default_typewriter_speed() -> u32 {
    DEFAULT_TYPEWRITER_SPEED
}
fn default_verify_tls() -> bool {
    DEFAULT_VERIFY_TLS
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
            typewriter_speed: DEFAULT_TYPEWRITER_SPEED,
            verify_tls: DEFAULT_VERIFY_TLS,
            session_file: None,
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved session file path
    pub fn session_path(&self) -> PathBuf {
        let raw = self
            .session_file
            .as_deref()
            .unwrap_or("~/.agent-portal/sessions.json");
        PathBuf::from(shellexpand::tilde(raw).as_ref())
    }
}

// ============================================
// AGENT ENDPOINTS
// ============================================

/// Endpoint of one agent page, keyed by page filename in `Config::agents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Fixed URL the prompt is posted to
    pub url: String,
    /// Literal bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    /// Environment variable holding the bearer token (checked when `bearer_token` is unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_env: Option<String>,
    /// Per-agent timeout override in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Per-agent typewriter speed override, words per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typewriter_speed: Option<u32>,
}

impl AgentConfig {
    /// Resolve the bearer token, literal first, then the named environment variable
    pub fn resolve_token(&self) -> Option<String> {
        self.bearer_token.clone().or_else(|| {
            self.bearer_token_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
        })
    }
}

// ============================================
// MAIN CONFIG
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue: Option<CatalogueConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChatConfig>,
    /// Agent endpoints keyed by page filename (e.g. "2_🤓_Expert_Support.py")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<HashMap<String, AgentConfig>>,
}

impl Config {
    /// Returns the pages directory, tilde expanded, or DEFAULT_PAGES_DIR
    pub fn get_pages_dir(&self) -> PathBuf {
        let raw = self.pages_dir.as_deref().unwrap_or(DEFAULT_PAGES_DIR);
        PathBuf::from(shellexpand::tilde(raw).as_ref())
    }

    /// Returns the browser tab title, or DEFAULT_PAGE_TITLE
    pub fn get_page_title(&self) -> String {
        self.page_title
            .clone()
            .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string())
    }

    /// Returns the landing page heading, or DEFAULT_TITLE
    pub fn get_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Returns the catalogue configuration, or defaults if not configured
    pub fn get_catalogue(&self) -> CatalogueConfig {
        self.catalogue.clone().unwrap_or_default()
    }

    /// Returns the chat configuration, or defaults if not configured
    pub fn get_chat(&self) -> ChatConfig {
        self.chat.clone().unwrap_or_default()
    }

    /// Returns the endpoint for a page filename, if configured
    pub fn get_agent(&self, filename: &str) -> Option<&AgentConfig> {
        self.agents.as_ref().and_then(|agents| agents.get(filename))
    }

    /// Apply environment overrides (`PAGE_TITLE`, `TITLE`) on top of the file values
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(page_title) = lookup(PAGE_TITLE_ENV) {
            self.page_title = Some(page_title);
        }
        if let Some(title) = lookup(TITLE_ENV) {
            self.title = Some(title);
        }
    }
}
