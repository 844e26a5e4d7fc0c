//! Page filename decomposition
//!
//! `2_🤓_Expert_Support.py` → ordinal `2`, icon `🤓`, title `Expert Support`.

use crate::config::CatalogueConfig;
use crate::error::PortalError;

/// Parts recovered from a page filename
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFilename {
    pub ordinal: i64,
    pub icon: String,
    pub title: String,
}

/// Strip a recognised extension (`.py` by default), if present
pub fn strip_page_extension<'a>(filename: &'a str, extensions: &[String]) -> &'a str {
    for ext in extensions {
        let ext = ext.trim_start_matches('.');
        if let Some(stem) = filename.strip_suffix(ext) {
            if let Some(stem) = stem.strip_suffix('.') {
                return stem;
            }
        }
    }
    filename
}

/// Decompose a page filename into ordinal, icon and title.
///
/// Requires at least three separator-delimited parts and an integer first
/// part. Title parts are joined with spaces and any separator left in the
/// result becomes a space.
pub fn parse_page_filename(
    filename: &str,
    options: &CatalogueConfig,
) -> Result<ParsedFilename, PortalError> {
    let stem = strip_page_extension(filename, &options.extensions);
    let parts: Vec<&str> = stem.split(options.separator).collect();

    if parts.len() < 3 {
        return Err(PortalError::FilenameFormat {
            filename: filename.to_string(),
            reason: format!(
                "expected <ordinal>{sep}<icon>{sep}<title>, found {} part(s)",
                parts.len(),
                sep = options.separator
            ),
        });
    }

    let ordinal = parts[0].trim().parse::<i64>().map_err(|e| PortalError::FilenameFormat {
        filename: filename.to_string(),
        reason: format!("ordinal '{}' is not an integer ({})", parts[0], e),
    })?;

    let title = parts[2..]
        .join(" ")
        .replace(options.separator, " ");

    Ok(ParsedFilename {
        ordinal,
        icon: parts[1].to_string(),
        title,
    })
}
