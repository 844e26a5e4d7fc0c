//! Catalogue search and filtering
//!
//! Search is plain substring matching over a lowercase text blob per
//! record, with exact-ordinal and icon fallbacks. No fuzzy matching and no
//! scoring; matches keep the catalogue's order.

use serde::Serialize;

use super::types::DemoRecord;

/// Build the lowercase search blob for a record.
///
/// Title words (split on whitespace), then categories, then tags, joined by
/// single spaces. No stemming, deduplication or stop words.
pub fn derive_searchable_text(title: &str, categories: &[String], tags: &[String]) -> String {
    let title_lower = title.to_lowercase();
    title_lower
        .split_whitespace()
        .map(str::to_string)
        .chain(categories.iter().map(|c| c.to_lowercase()))
        .chain(tags.iter().map(|t| t.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which criterion admitted a record into the results
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Query is a substring of the searchable text
    Text,
    /// Query is exactly the ordinal
    Ordinal,
    /// Query is a substring of the icon
    Icon,
}

impl MatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::Text => "text",
            MatchKind::Ordinal => "ordinal",
            MatchKind::Icon => "icon",
        }
    }
}

/// Match one record against an already-lowercased query.
/// Criteria are checked in precedence order and the first hit wins.
pub fn match_record(record: &DemoRecord, query_lower: &str) -> Option<MatchKind> {
    if record.searchable_text().contains(query_lower) {
        Some(MatchKind::Text)
    } else if query_lower == record.ordinal().to_string() {
        Some(MatchKind::Ordinal)
    } else if record.icon().to_lowercase().contains(query_lower) {
        Some(MatchKind::Icon)
    } else {
        None
    }
}

/// True when the query should leave the catalogue unfiltered
pub fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

/// Filter records by a free-text query, preserving input order.
///
/// A blank query returns every record.
pub fn filter_records(records: &[DemoRecord], query: &str) -> Vec<DemoRecord> {
    filter_with_matches(records, query)
        .into_iter()
        .map(|(record, _)| record.clone())
        .collect()
}

/// Like [`filter_records`] but borrows and reports the matching criterion.
/// Blank queries report `None` for every record.
pub fn filter_with_matches<'a>(
    records: &'a [DemoRecord],
    query: &str,
) -> Vec<(&'a DemoRecord, Option<MatchKind>)> {
    if is_blank_query(query) {
        return records.iter().map(|r| (r, None)).collect();
    }

    let query_lower = query.to_lowercase();
    records
        .iter()
        .filter_map(|record| {
            match_record(record, &query_lower).map(|kind| (record, Some(kind)))
        })
        .collect()
}

/// Resolve a user-supplied page reference.
///
/// Tried in order: exact filename, ordinal, case-insensitive title. Ordinals
/// aren't guaranteed unique; the first record in catalogue order wins.
pub fn find_record<'a>(records: &'a [DemoRecord], key: &str) -> Option<&'a DemoRecord> {
    let key = key.trim();
    if let Some(record) = records.iter().find(|r| r.filename() == key) {
        return Some(record);
    }
    if let Ok(ordinal) = key.parse::<i64>() {
        if let Some(record) = records.iter().find(|r| r.ordinal() == ordinal) {
            return Some(record);
        }
    }
    let key_lower = key.to_lowercase();
    records
        .iter()
        .find(|r| r.title().to_lowercase() == key_lower)
}
