//! Catalogue module - demo page discovery and search
//!
//! This module provides functionality for:
//! - Decomposing page filenames into ordinal, icon and title
//! - Building the ordered catalogue from the pages directory
//! - Substring search with ordinal and icon fallbacks
//!
//! # Module Structure
//!
//! - `types` - Core data types (DemoRecord, CatalogueReport, CatalogueWarning)
//! - `filename` - Page filename decomposition
//! - `loader` - Catalogue building from the file system
//! - `search` - Searchable text derivation and filtering

mod filename;
mod loader;
mod search;
mod types;

// Re-export core types
pub use types::{CatalogueReport, CatalogueWarning, DemoRecord, WarningKind};

pub use filename::{parse_page_filename, strip_page_extension, ParsedFilename};

pub use loader::{build_catalogue, build_catalogue_report, is_page_file};

pub use search::{
    derive_searchable_text, filter_records, filter_with_matches, find_record, is_blank_query,
    match_record, MatchKind,
};
