//! Catalogue type definitions
//!
//! This module contains the core data types for the demo catalogue:
//! records, the report returned by a build, and the per-file warnings
//! collected while building it.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ErrorSeverity, PortalError};
use crate::metadata_parser::DemoMetadata;

use super::filename::ParsedFilename;
use super::search::derive_searchable_text;

/// One catalogue entry, representing a single demo page.
///
/// Records are immutable once built. `searchable_text` is derived in the
/// constructor and can't drift from the title, categories and tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRecord {
    filename: String,
    ordinal: i64,
    icon: String,
    title: String,
    categories: Vec<String>,
    tags: Vec<String>,
    searchable_text: String,
    #[serde(skip)]
    path: PathBuf,
}

impl DemoRecord {
    pub fn new(
        filename: impl Into<String>,
        ordinal: i64,
        icon: impl Into<String>,
        title: impl Into<String>,
        categories: Vec<String>,
        tags: Vec<String>,
    ) -> Self {
        let filename = filename.into();
        let title = title.into();
        let searchable_text = derive_searchable_text(&title, &categories, &tags);
        Self {
            path: PathBuf::from(&filename),
            filename,
            ordinal,
            icon: icon.into(),
            title,
            categories,
            tags,
            searchable_text,
        }
    }

    /// Build a record from a decomposed filename and the page's metadata
    pub fn from_page(
        path: &Path,
        filename: &str,
        parsed: ParsedFilename,
        metadata: DemoMetadata,
    ) -> Self {
        Self::new(
            filename,
            parsed.ordinal,
            parsed.icon,
            parsed.title,
            metadata.categories,
            metadata.tags,
        )
        .with_path(path)
    }

    /// Same record located at `path`
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self
        }
    }

    /// Page filename; the navigation target
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn ordinal(&self) -> i64 {
        self.ordinal
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Lowercase search blob: title words, then categories, then tags
    pub fn searchable_text(&self) -> &str {
        &self.searchable_text
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display label used in headings (e.g. "🤓 Expert Support")
    pub fn label(&self) -> String {
        if self.icon.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.icon, self.title)
        }
    }
}

/// What went wrong with a skipped or degraded page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    FilenameFormat,
    MetadataParse,
    DirectoryMissing,
    Io,
}

/// Non-fatal diagnostic collected while building the catalogue
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogueWarning {
    pub kind: WarningKind,
    pub severity: ErrorSeverity,
    /// The page the warning is about, when there is one
    pub filename: Option<String>,
    pub message: String,
}

impl CatalogueWarning {
    pub fn from_error(filename: Option<&str>, error: &PortalError) -> Self {
        let kind = match error {
            PortalError::FilenameFormat { .. } => WarningKind::FilenameFormat,
            PortalError::MetadataParse { .. } => WarningKind::MetadataParse,
            PortalError::DirectoryMissing { .. } => WarningKind::DirectoryMissing,
            _ => WarningKind::Io,
        };
        Self {
            kind,
            severity: error.severity(),
            filename: filename.map(str::to_string),
            message: error.to_string(),
        }
    }

    /// True when a named page was left out of the catalogue entirely.
    /// Directory-level failures name no page and are not counted.
    pub fn excluded_record(&self) -> bool {
        self.filename.is_some()
            && matches!(self.kind, WarningKind::FilenameFormat | WarningKind::Io)
    }
}

/// Outcome of a catalogue build: ordered records plus diagnostics
#[derive(Clone, Debug, Default, Serialize)]
pub struct CatalogueReport {
    pub records: Vec<DemoRecord>,
    pub warnings: Vec<CatalogueWarning>,
}

impl CatalogueReport {
    pub fn skipped_count(&self) -> usize {
        self.warnings.iter().filter(|w| w.excluded_record()).count()
    }
}
