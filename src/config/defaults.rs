//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Landing page titles
pub const DEFAULT_PAGE_TITLE: &str = "SnapLogic GenAI Builder Portal";
pub const DEFAULT_TITLE: &str = "SnapLogic GenAI Builder Portal";

/// Directory holding the demo pages, relative to the working directory
pub const DEFAULT_PAGES_DIR: &str = "pages";

/// Filename decomposition: `<ordinal>_<icon>_<title words>.py`
pub const DEFAULT_SEPARATOR: char = '_';
pub const DEFAULT_PAGE_EXTENSIONS: &[&str] = &["py"];

/// Index/initialisation files that are never catalogued
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &["__init__.py"];

/// Chat defaults
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TYPEWRITER_SPEED: u32 = 10;
pub const DEFAULT_VERIFY_TLS: bool = false;

/// Config file location (tilde expanded) and its override variable
pub const DEFAULT_CONFIG_PATH: &str = "~/.agent-portal/config.json";
pub const CONFIG_PATH_ENV: &str = "AGENT_PORTAL_CONFIG";

/// Environment overrides for the landing page
pub const PAGE_TITLE_ENV: &str = "PAGE_TITLE";
pub const TITLE_ENV: &str = "TITLE";
