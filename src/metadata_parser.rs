//! Demo metadata parser
//!
//! Harvests the `DEMO_METADATA = { ... }` declaration from a demo page by
//! scanning its raw text. The page is never imported or executed.
//!
//! Example page header:
//! ```python
//! DEMO_METADATA = {
//!     "categories": ["Technical"],
//!     "tags": ["SnapLogic", "Expert", "Support"]
//! }
//! ```
//!
//! # Grammar
//!
//! Only a flat map of string keys to string lists is understood:
//!
//! ```text
//! block   := "DEMO_METADATA" ws? "=" ws? "{" entries "}"
//! entries := entry ("," entry)* ","?
//! entry   := key ws? ":" ws? "[" items "]"
//! key     := string | identifier
//! items   := string ("," string)* ","?
//! string  := '"' chars '"' | "'" chars "'"
//! ```
//!
//! The declaration must start a code line. `categories` and `tags` are
//! located independently among the block's top-level entries and either may
//! be missing. Any other key is ignored. `#` comments outside strings are
//! skipped both when matching brackets and when looking for keys.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

/// Name of the declaration that carries the metadata block
pub const METADATA_BLOCK_NAME: &str = "DEMO_METADATA";

/// Categories and tags declared by a demo page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoMetadata {
    /// Categories in declaration order
    #[serde(default)]
    pub categories: Vec<String>,
    /// Tags in declaration order
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Result of scanning a page for its metadata block
#[derive(Debug, Clone, Default)]
pub struct MetadataParseResult {
    /// Harvested metadata; empty lists when nothing usable was found
    pub metadata: DemoMetadata,
    /// Parse or read errors encountered (non-fatal)
    pub errors: Vec<String>,
}

impl MetadataParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Declaration at the start of a code line, optionally type-annotated.
/// The annotation can't cross a newline, so prose in comments never matches.
fn block_start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*DEMO_METADATA[ \t]*(?::[^=\n]*)?=\s*\{")
            .expect("static regex is valid")
    })
}

/// Extract demo metadata from page content.
///
/// A page without a metadata block, or a block without `categories` /
/// `tags`, yields empty lists and no errors.
pub fn extract_demo_metadata(content: &str) -> MetadataParseResult {
    let mut result = MetadataParseResult::default();

    let Some(found) = block_start_regex().find(content) else {
        return result;
    };

    // The match ends just past the opening brace
    let obj_start = found.end() - 1;
    let block = match extract_balanced(content, obj_start, '{', '}') {
        Ok((block, _)) => block,
        Err(e) => {
            result.errors.push(e);
            return result;
        }
    };

    match extract_list(block, "categories") {
        Ok(categories) => result.metadata.categories = categories,
        Err(e) => result.errors.push(format!("categories: {}", e)),
    }
    match extract_list(block, "tags") {
        Ok(tags) => result.metadata.tags = tags,
        Err(e) => result.errors.push(format!("tags: {}", e)),
    }

    debug!(
        categories = ?result.metadata.categories,
        tags = ?result.metadata.tags,
        errors = result.errors.len(),
        "Parsed demo metadata"
    );

    result
}

/// Read a page from disk and extract its metadata.
///
/// An unreadable page yields empty metadata with the I/O error recorded.
pub fn read_demo_metadata(path: &Path) -> MetadataParseResult {
    match std::fs::read_to_string(path) {
        Ok(content) => extract_demo_metadata(&content),
        Err(e) => {
            warn!(
                error = %e,
                path = %path.display(),
                "Failed to read demo page, metadata left empty"
            );
            MetadataParseResult {
                errors: vec![format!("Failed to read page: {}", e)],
                ..Default::default()
            }
        }
    }
}

/// Locate `key: [ ... ]` inside a block and split its items.
/// A missing key is an empty list, an unterminated list is an error.
fn extract_list(block: &str, key: &str) -> Result<Vec<String>, String> {
    let Some(list_start) = find_list_start(block, key) else {
        return Ok(Vec::new());
    };
    let (list, _) = extract_balanced(block, list_start, '[', ']')?;

    // Strip the surrounding brackets
    let inner = &list[1..list.len() - 1];
    Ok(split_items(inner))
}

/// Split a comma-separated sequence of quoted literals.
/// Commas inside quotes do not split; quotes and whitespace are stripped;
/// empty items are dropped.
fn split_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escape_next = false;

    for c in inner.chars() {
        if escape_next {
            current.push(c);
            escape_next = false;
            continue;
        }
        match quote {
            Some(q) => {
                if c == '\\' {
                    escape_next = true;
                    continue;
                }
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                ',' => {
                    push_item(&mut items, &current);
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    push_item(&mut items, &current);

    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let cleaned = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    if !cleaned.is_empty() {
        items.push(cleaned.to_string());
    }
}

/// Lexical unit of a page, with comments and whitespace dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    /// Quoted literal, without its quotes
    Str(&'a str),
    Ident(&'a str),
    Punct(char),
}

/// Scanner over page text yielding `(offset, token)`.
///
/// `#` starts a comment outside strings; backslash escapes inside strings.
/// An unterminated string ends the scan.
struct Tokens<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.pos;
            let rest = &self.src[start..];
            let c = rest.chars().next()?;

            if c.is_whitespace() {
                self.pos += c.len_utf8();
                continue;
            }
            if c == '#' {
                self.pos += rest.find('\n').unwrap_or(rest.len());
                continue;
            }
            if c == '"' || c == '\'' {
                let body_start = start + 1;
                let mut escape_next = false;
                for (i, ch) in self.src[body_start..].char_indices() {
                    if escape_next {
                        escape_next = false;
                    } else if ch == '\\' {
                        escape_next = true;
                    } else if ch == c {
                        let body_end = body_start + i;
                        self.pos = body_end + 1;
                        return Some((start, Token::Str(&self.src[body_start..body_end])));
                    }
                }
                self.pos = self.src.len();
                return None;
            }
            if c.is_alphanumeric() || c == '_' {
                let len = rest
                    .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                    .unwrap_or(rest.len());
                self.pos += len;
                return Some((start, Token::Ident(&rest[..len])));
            }

            self.pos += c.len_utf8();
            return Some((start, Token::Punct(c)));
        }
    }
}

#[derive(Clone, Copy)]
enum KeyState {
    Idle,
    Key,
    Colon,
}

/// Offset of the `[` opening `key`'s list among the block's top-level entries.
/// Keys inside comments, strings or nested values never match.
fn find_list_start(block: &str, key: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut state = KeyState::Idle;

    for (pos, token) in Tokens::new(block, 0) {
        let top_level = depth == 1;
        state = match (state, token) {
            (KeyState::Colon, Token::Punct('[')) if top_level => return Some(pos),
            (_, Token::Str(name) | Token::Ident(name)) if top_level && name == key => {
                KeyState::Key
            }
            (KeyState::Key, Token::Punct(':')) if top_level => KeyState::Colon,
            _ => KeyState::Idle,
        };
        match token {
            Token::Punct('{' | '[' | '(') => depth += 1,
            Token::Punct('}' | ']' | ')') => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Extract a balanced `open ... close` region starting at `start`.
/// Returns (region, end_index) on success.
fn extract_balanced(
    content: &str,
    start: usize,
    open: char,
    close: char,
) -> Result<(&str, usize), String> {
    if !content.get(start..).is_some_and(|rest| rest.starts_with(open)) {
        return Err(format!("Expected '{}' at offset {}", open, start));
    }

    let mut depth = 0usize;
    for (pos, token) in Tokens::new(content, start) {
        match token {
            Token::Punct(c) if c == open => depth += 1,
            Token::Punct(c) if c == close => {
                depth -= 1;
                if depth == 0 {
                    let end = pos + c.len_utf8();
                    return Ok((&content[start..end], end));
                }
            }
            _ => {}
        }
    }

    Err(format!("Unbalanced '{}' in {} block", open, METADATA_BLOCK_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_block() {
        let content = r#"DEMO_METADATA = {"categories": ["Technical"], "tags": ["SnapLogic", "Expert", "Support"]}"#;
        let result = extract_demo_metadata(content);
        assert!(result.errors.is_empty(), "Errors: {:?}", result.errors);
        assert_eq!(result.metadata.categories, vec!["Technical"]);
        assert_eq!(result.metadata.tags, vec!["SnapLogic", "Expert", "Support"]);
    }

    #[test]
    fn test_parse_page_header() {
        let content = r#"import streamlit as st
import requests

# Demo metadata for search and filtering
DEMO_METADATA = {
    "categories": ["Technical"],
    "tags": ["Data Science", "Analytics", "Machine Learning"]
}

URL = "https://example.com/api"
"#;
        let result = extract_demo_metadata(content);
        assert!(!result.has_errors());
        assert_eq!(result.metadata.categories, vec!["Technical"]);
        assert_eq!(
            result.metadata.tags,
            vec!["Data Science", "Analytics", "Machine Learning"]
        );
    }

    #[test]
    fn test_no_block_is_empty_not_error() {
        let content = "import streamlit as st\nst.title('Hello')\n";
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata, DemoMetadata::default());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_list_is_empty() {
        let content = r#"DEMO_METADATA = { "tags": ["Sales"] }"#;
        let result = extract_demo_metadata(content);
        assert!(result.metadata.categories.is_empty());
        assert_eq!(result.metadata.tags, vec!["Sales"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_whitespace_quotes_and_empty_items() {
        let content = "DEMO_METADATA = { 'categories': [ ' Business ' ,, \"\", 'Ops', ] }";
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.categories, vec!["Business", "Ops"]);
    }

    #[test]
    fn test_comma_inside_quotes_does_not_split() {
        let content = r#"DEMO_METADATA = { "tags": ["Search, Retrieval", "RAG"] }"#;
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.tags, vec!["Search, Retrieval", "RAG"]);
    }

    #[test]
    fn test_unicode_values_preserved() {
        let content = r#"DEMO_METADATA = { "categories": ["Réclamations"], "tags": ["✈️ Travel"] }"#;
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.categories, vec!["Réclamations"]);
        assert_eq!(result.metadata.tags, vec!["✈️ Travel"]);
    }

    #[test]
    fn test_braces_in_strings_and_comments() {
        let content = r#"
DEMO_METADATA = {
    # closing } in a comment
    "categories": ["{curly}"],
    "tags": ["a}b"]
}
"#;
        let result = extract_demo_metadata(content);
        assert!(result.errors.is_empty(), "Errors: {:?}", result.errors);
        assert_eq!(result.metadata.categories, vec!["{curly}"]);
        assert_eq!(result.metadata.tags, vec!["a}b"]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let content = r#"DEMO_METADATA = { "owner": ["team"], "categories": ["Business"] }"#;
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.categories, vec!["Business"]);
        assert!(result.metadata.tags.is_empty());
    }

    #[test]
    fn test_type_annotated_declaration() {
        let content = r#"DEMO_METADATA: dict[str, list[str]] = { "tags": ["Typed"] }"#;
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.tags, vec!["Typed"]);
    }

    #[test]
    fn test_unbalanced_block_reports_error() {
        let content = r#"DEMO_METADATA = { "categories": ["Technical"]"#;
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata, DemoMetadata::default());
        assert!(result.has_errors());
    }

    #[test]
    fn test_unterminated_list_keeps_other_list() {
        let content = r#"DEMO_METADATA = { "tags": ["a", "b"], "categories": ["x" }"#;
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.tags, vec!["a", "b"]);
        assert!(result.metadata.categories.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("categories"));
    }

    #[test]
    fn test_declaration_mentioned_in_comment_is_skipped() {
        let content = r#"# DEMO_METADATA: categories and tags for the portal search
CONFIG = {"mode": "x"}

DEMO_METADATA = {
    "categories": ["Technical"],
    "tags": ["SnapLogic"]
}
"#;
        let result = extract_demo_metadata(content);
        assert!(result.errors.is_empty(), "Errors: {:?}", result.errors);
        assert_eq!(result.metadata.categories, vec!["Technical"]);
        assert_eq!(result.metadata.tags, vec!["SnapLogic"]);
    }

    #[test]
    fn test_indented_declaration_is_found() {
        let content = "if True:\n    DEMO_METADATA = {\"tags\": [\"Nested\"]}\n";
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.tags, vec!["Nested"]);
    }

    #[test]
    fn test_commented_out_key_is_skipped() {
        let content = r#"DEMO_METADATA = {
    # "tags": ["old"],
    "categories": ["Business"],  # "categories": ["stale"]
    "tags": ["new"]
}"#;
        let result = extract_demo_metadata(content);
        assert!(result.errors.is_empty(), "Errors: {:?}", result.errors);
        assert_eq!(result.metadata.categories, vec!["Business"]);
        assert_eq!(result.metadata.tags, vec!["new"]);
    }

    #[test]
    fn test_key_inside_a_value_is_skipped() {
        let content = r#"DEMO_METADATA = {
    "owner": "tags: [x]",
    "extra": {"tags": ["nested"]},
    "labels": ["tags"],
    tags: ["Real"]
}"#;
        let result = extract_demo_metadata(content);
        assert_eq!(result.metadata.tags, vec!["Real"]);
        assert!(result.metadata.categories.is_empty());
    }

    #[test]
    fn test_read_missing_file_is_empty_with_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = read_demo_metadata(&dir.path().join("missing.py"));
        assert_eq!(result.metadata, DemoMetadata::default());
        assert!(result.has_errors());
    }
}
