//! Terminal and JSON rendering
//!
//! Turns catalogue records, build warnings and chat history into text for
//! the CLI. Everything here returns `String`s so callers decide where the
//! output goes.

use serde::Serialize;

use crate::catalogue::{CatalogueWarning, DemoRecord, MatchKind};
use crate::chat::{ChatSession, MessageRole};
use crate::error::ErrorSeverity;

const RULE: &str = "---";

/// One catalogue card: heading, categories, tags and the navigation target
pub fn render_card(record: &DemoRecord, matched: Option<MatchKind>) -> String {
    let mut lines = vec![format!("{:>3}. {}", record.ordinal(), record.label())];
    if !record.categories().is_empty() {
        lines.push(format!("     Categories: {}", record.categories().join(", ")));
    }
    if !record.tags().is_empty() {
        lines.push(format!("     Tags: {}", record.tags().join(", ")));
    }
    lines.push(format!("     → {}", record.filename()));
    if let Some(kind) = matched {
        lines.push(format!("     (matched by {})", kind.label()));
    }
    lines.join("\n")
}

/// Cards for a (possibly filtered) catalogue, separated by blank lines.
///
/// `explain` adds which criterion admitted each record.
pub fn render_catalogue(matches: &[(&DemoRecord, Option<MatchKind>)], explain: bool) -> String {
    matches
        .iter()
        .map(|(record, kind)| render_card(record, if explain { *kind } else { None }))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Informational line for a search with no results
pub fn render_zero_results(query: &str) -> String {
    format!("ℹ️  No demos match \"{}\". Try another keyword.", query.trim())
}

/// One banner line per warning
pub fn render_warnings(warnings: &[CatalogueWarning]) -> Vec<String> {
    warnings
        .iter()
        .map(|warning| {
            let marker = match warning.severity {
                ErrorSeverity::Info => "ℹ️ ",
                ErrorSeverity::Warning => "⚠️ ",
                ErrorSeverity::Error => "❌",
            };
            format!("{} {}", marker, warning.message)
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMatch<'a> {
    #[serde(flatten)]
    record: &'a DemoRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_by: Option<MatchKind>,
}

/// Pretty JSON array of records, with `matchedBy` when `explain` is set
pub fn render_json(
    matches: &[(&DemoRecord, Option<MatchKind>)],
    explain: bool,
) -> serde_json::Result<String> {
    let items: Vec<JsonMatch<'_>> = matches
        .iter()
        .map(|(record, kind)| JsonMatch {
            record,
            matched_by: if explain { *kind } else { None },
        })
        .collect();
    serde_json::to_string_pretty(&items)
}

/// Full view of one record
pub fn render_detail(record: &DemoRecord) -> String {
    let or_none = |items: &[String]| {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join(", ")
        }
    };
    [
        record.label(),
        RULE.to_string(),
        format!("Ordinal:    {}", record.ordinal()),
        format!("Icon:       {}", record.icon()),
        format!("Title:      {}", record.title()),
        format!("Categories: {}", or_none(record.categories())),
        format!("Tags:       {}", or_none(record.tags())),
        format!("Page:       {}", record.path().display()),
    ]
    .join("\n")
}

/// Landing page: title, demo count and the sidebar-style list of demos
pub fn render_home(page_title: &str, title: &str, records: &[DemoRecord]) -> String {
    let mut lines = Vec::new();
    // The page title stands in for the browser tab
    if page_title != title {
        lines.push(format!("[{}]", page_title));
    }
    lines.extend([
        title.to_string(),
        RULE.to_string(),
        format!(
            "This portal presents {} AI agent demo{}.",
            records.len(),
            if records.len() == 1 { "" } else { "s" }
        ),
        String::new(),
        "Demo catalogue:".to_string(),
    ]);
    if records.is_empty() {
        lines.push("  (no demos found)".to_string());
    }
    lines.extend(
        records
            .iter()
            .map(|record| format!("  {:>3}. {}", record.ordinal(), record.label())),
    );
    lines.push(String::new());
    lines.push(
        "Pick a demo with `show <ordinal>` or talk to it with `chat <ordinal> <prompt>`."
            .to_string(),
    );
    lines.join("\n")
}

/// Chat history of one session, oldest first
pub fn render_history(session: &ChatSession) -> String {
    session
        .messages
        .iter()
        .map(|message| {
            let who = match message.role {
                MessageRole::User => "You",
                MessageRole::Assistant => "Agent",
            };
            match &message.summary {
                Some(summary) => format!("{}: {}\n  Summary: {}", who, message.content, summary),
                None => format!("{}: {}", who, message.content),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
