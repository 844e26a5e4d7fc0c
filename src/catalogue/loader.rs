//! Catalogue loading from the pages directory
//!
//! Every call rebuilds the catalogue from scratch: list the directory,
//! decompose each filename, scan each page for its metadata block, then
//! stable-sort by ordinal. A bad page costs one record, never the build.

use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::config::CatalogueConfig;
use crate::error::PortalError;
use crate::logging::log_catalogue_event;
use crate::metadata_parser::read_demo_metadata;

use super::filename::parse_page_filename;
use super::types::{CatalogueReport, CatalogueWarning, DemoRecord};

/// Build the ordered catalogue for `pages_dir`.
/// Returns an empty list if the directory doesn't exist.
pub fn build_catalogue(pages_dir: &Path, options: &CatalogueConfig) -> Vec<DemoRecord> {
    build_catalogue_report(pages_dir, options).records
}

/// Build the catalogue and keep the diagnostics for display.
#[instrument(level = "debug", skip(options), fields(dir = %pages_dir.display()))]
pub fn build_catalogue_report(pages_dir: &Path, options: &CatalogueConfig) -> CatalogueReport {
    let mut report = CatalogueReport::default();

    if !pages_dir.is_dir() {
        let err = PortalError::DirectoryMissing {
            path: pages_dir.display().to_string(),
        };
        debug!(path = %pages_dir.display(), "Pages directory not found, catalogue is empty");
        report.warnings.push(CatalogueWarning::from_error(None, &err));
        return report;
    }

    let files = match list_page_files(pages_dir, options, &mut report.warnings) {
        Ok(files) => files,
        Err(e) => {
            warn!(
                error = %e,
                path = %pages_dir.display(),
                "Failed to read pages directory"
            );
            report.warnings.push(CatalogueWarning::from_error(None, &e));
            return report;
        }
    };

    for (filename, path) in files {
        match load_record(&path, &filename, options, &mut report.warnings) {
            Some(record) => report.records.push(record),
            None => continue,
        }
    }

    // Stable: equal ordinals keep directory order
    report.records.sort_by_key(|record| record.ordinal());

    log_catalogue_event("build", report.records.len(), report.skipped_count());
    report
}

/// Turn one page into a record, pushing any diagnostics.
/// Returns None when the page is excluded.
fn load_record(
    path: &Path,
    filename: &str,
    options: &CatalogueConfig,
    warnings: &mut Vec<CatalogueWarning>,
) -> Option<DemoRecord> {
    let parsed = match parse_page_filename(filename, options) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, filename = filename, "Skipping page with invalid filename");
            warnings.push(CatalogueWarning::from_error(Some(filename), &e));
            return None;
        }
    };

    let metadata = read_demo_metadata(path);
    if metadata.has_errors() {
        let err = PortalError::MetadataParse {
            path: filename.to_string(),
            message: metadata.errors.join("; "),
        };
        warn!(error = %err, "Demo metadata incomplete, continuing with what was found");
        warnings.push(CatalogueWarning::from_error(Some(filename), &err));
    }

    Some(DemoRecord::from_page(path, filename, parsed, metadata.metadata))
}

/// True for files the catalogue should consider
pub fn is_page_file(filename: &str, options: &CatalogueConfig) -> bool {
    if options.excluded_files.iter().any(|excluded| excluded == filename) {
        return false;
    }
    options.extensions.iter().any(|ext| {
        let ext = ext.trim_start_matches('.');
        filename
            .strip_suffix(ext)
            .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
    })
}

/// List page files as (filename, path) pairs in lexicographic filename order.
/// Entries that cannot be read or named push a warning and are dropped.
fn list_page_files(
    pages_dir: &Path,
    options: &CatalogueConfig,
    warnings: &mut Vec<CatalogueWarning>,
) -> Result<Vec<(String, PathBuf)>, PortalError> {
    let entries = std::fs::read_dir(pages_dir).map_err(|source| PortalError::Io {
        path: pages_dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let err = PortalError::Io {
                    path: pages_dir.display().to_string(),
                    source,
                };
                warn!(error = %err, "Skipping unreadable directory entry");
                warnings.push(CatalogueWarning::from_error(None, &err));
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            let lossy = entry.file_name().to_string_lossy().into_owned();
            if !is_page_file(&lossy, options) {
                continue;
            }
            let err = PortalError::FilenameFormat {
                filename: lossy.clone(),
                reason: "filename is not valid UTF-8".to_string(),
            };
            warn!(path = %path.display(), "Skipping page with non UTF-8 filename");
            warnings.push(CatalogueWarning::from_error(Some(&lossy), &err));
            continue;
        };
        if is_page_file(filename, options) {
            files.push((filename.to_string(), path.clone()));
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_page(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn metadata_block(categories: &[&str], tags: &[&str]) -> String {
        let quote = |items: &[&str]| {
            items
                .iter()
                .map(|s| format!("\"{}\"", s))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "import streamlit as st\n\nDEMO_METADATA = {{\n    \"categories\": [{}],\n    \"tags\": [{}]\n}}\n",
            quote(categories),
            quote(tags)
        )
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let report = build_catalogue_report(&dir.path().join("pages"), &CatalogueConfig::default());
        assert!(report.records.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.skipped_count(), 0);
    }

    #[test]
    fn test_builds_records_with_metadata() {
        let dir = TempDir::new().unwrap();
        write_page(
            dir.path(),
            "1_🤖_Sales_Assistant.py",
            &metadata_block(&["Business"], &["Sales"]),
        );
        write_page(
            dir.path(),
            "2_🤓_Expert_Support.py",
            &metadata_block(&["Technical"], &["SnapLogic", "Expert"]),
        );

        let records = build_catalogue(dir.path(), &CatalogueConfig::default());
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.ordinal(), 1);
        assert_eq!(first.icon(), "🤖");
        assert_eq!(first.title(), "Sales Assistant");
        assert_eq!(first.categories(), ["Business"]);
        assert_eq!(first.tags(), ["Sales"]);
        assert_eq!(first.searchable_text(), "sales assistant business sales");
        assert_eq!(first.path(), dir.path().join("1_🤖_Sales_Assistant.py"));

        assert_eq!(records[1].tags(), ["SnapLogic", "Expert"]);
    }

    #[test]
    fn test_sorted_by_ordinal_not_filename() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "10_a_Ten.py", "");
        write_page(dir.path(), "2_b_Two.py", "");
        write_page(dir.path(), "1_c_One.py", "");

        let records = build_catalogue(dir.path(), &CatalogueConfig::default());
        let ordinals: Vec<i64> = records.iter().map(|r| r.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 10]);
    }

    #[test]
    fn test_equal_ordinals_keep_filename_order() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "3_z_Zulu.py", "");
        write_page(dir.path(), "3_a_Alpha.py", "");
        write_page(dir.path(), "1_m_Mike.py", "");

        let records = build_catalogue(dir.path(), &CatalogueConfig::default());
        let names: Vec<&str> = records.iter().map(|r| r.filename()).collect();
        assert_eq!(names, vec!["1_m_Mike.py", "3_a_Alpha.py", "3_z_Zulu.py"]);
    }

    #[test]
    fn test_invalid_filenames_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "1_🤖_Good.py", "");
        write_page(dir.path(), "two_🤖_Bad.py", "");
        write_page(dir.path(), "3_Short.py", "");

        let report = build_catalogue_report(dir.path(), &CatalogueConfig::default());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].filename(), "1_🤖_Good.py");
        assert_eq!(report.skipped_count(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind == crate::catalogue::WarningKind::FilenameFormat));
    }

    #[test]
    fn test_non_page_and_init_files_ignored() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "__init__.py", "");
        write_page(dir.path(), "1_x_Notes.txt", "");
        write_page(dir.path(), "1_x_Page.py", "");
        fs::create_dir(dir.path().join("2_x_Folder.py")).unwrap();

        let report = build_catalogue_report(dir.path(), &CatalogueConfig::default());
        assert_eq!(report.records.len(), 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_page_without_metadata_is_included() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "5_📊_Analytics.py", "import streamlit as st\n");

        let report = build_catalogue_report(dir.path(), &CatalogueConfig::default());
        assert_eq!(report.records.len(), 1);
        assert!(report.records[0].categories().is_empty());
        assert!(report.records[0].tags().is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_malformed_metadata_warns_but_keeps_record() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "6_x_Broken.py", "DEMO_METADATA = { \"tags\": [\"a\"]\n");

        let report = build_catalogue_report(dir.path(), &CatalogueConfig::default());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.skipped_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_filename_is_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "1_🤖_Good.py", "");
        let bad = dir.path().join(OsStr::from_bytes(b"2_x_Bad\xff.py"));
        if fs::write(&bad, "").is_err() {
            // Some filesystems refuse non UTF-8 names
            return;
        }

        let report = build_catalogue_report(dir.path(), &CatalogueConfig::default());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        let warning = &report.warnings[0];
        assert_eq!(warning.kind, crate::catalogue::WarningKind::FilenameFormat);
        assert_eq!(warning.filename.as_deref(), Some("2_x_Bad\u{FFFD}.py"));
        assert_eq!(report.skipped_count(), 1);
    }

    #[test]
    fn test_directory_level_warnings_are_not_skipped_pages() {
        let io = PortalError::Io {
            path: "pages".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let report = CatalogueReport {
            records: Vec::new(),
            warnings: vec![
                CatalogueWarning::from_error(None, &io),
                CatalogueWarning::from_error(Some("3_x_Gone.py"), &io),
            ],
        };
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.warnings[0].severity, crate::error::ErrorSeverity::Error);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_warns_without_skipping() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir(&pages).unwrap();
        write_page(&pages, "1_x_A.py", "");
        fs::set_permissions(&pages, fs::Permissions::from_mode(0o000)).unwrap();

        let readable = fs::read_dir(&pages).is_ok();
        let report = build_catalogue_report(&pages, &CatalogueConfig::default());
        fs::set_permissions(&pages, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            // Running as root ignores permission bits
            return;
        }

        assert!(report.records.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, crate::catalogue::WarningKind::Io);
        assert_eq!(report.skipped_count(), 0);
    }

    #[test]
    fn test_is_page_file() {
        let options = CatalogueConfig::default();
        assert!(is_page_file("1_a_b.py", &options));
        assert!(!is_page_file("__init__.py", &options));
        assert!(!is_page_file("1_a_b.pyc", &options));
        assert!(!is_page_file("py", &options));
        assert!(!is_page_file(".py", &options));
    }
}
