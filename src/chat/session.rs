//! Per-session chat history
//!
//! A `SessionStore` holds one `ChatSession` per agent page, keyed by page
//! filename. Sessions are created on first visit and cleared when the
//! session ends. The store is an explicit value owned by the caller; it can
//! be saved to and loaded from a JSON file between CLI invocations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::client::{AgentTransport, ChatError, ChatReply};
use super::model::{ChatMessage, MessageRole, SessionId};
use crate::logging::log_chat_event;

/// Conversation with one agent page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: SessionId,
    pub page: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(page: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            page: page.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Send `prompt` through `transport` and record the exchange.
    ///
    /// The user message is appended before the request. If the request
    /// fails it is removed again, so a failed exchange leaves no trace.
    pub fn exchange(
        &mut self,
        prompt: &str,
        transport: &dyn AgentTransport,
    ) -> Result<ChatReply, ChatError> {
        self.messages.push(ChatMessage::user(prompt));

        match transport.send(prompt) {
            Ok(reply) => {
                self.messages.push(
                    ChatMessage::assistant(reply.answer.clone())
                        .with_summary(reply.summary.clone()),
                );
                self.updated_at = Utc::now();
                Ok(reply)
            }
            Err(e) => {
                self.messages.pop();
                Err(e)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// All chat sessions for one portal user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStore {
    sessions: BTreeMap<String, ChatSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `page`, if one was started
    pub fn session(&self, page: &str) -> Option<&ChatSession> {
        self.sessions.get(page)
    }

    /// Session for `page`, created on first visit
    pub fn session_mut(&mut self, page: &str) -> &mut ChatSession {
        self.sessions.entry(page.to_string()).or_insert_with(|| {
            let session = ChatSession::new(page);
            debug!(page = page, session_id = %session.id, "Starting chat session");
            log_chat_event(page, "session_start", None, true);
            session
        })
    }

    /// End the session for `page`, dropping its history
    pub fn end_session(&mut self, page: &str) -> Option<ChatSession> {
        let ended = self.sessions.remove(page);
        if ended.is_some() {
            log_chat_event(page, "session_end", None, true);
        }
        ended
    }

    /// End every session
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Load a store from disk. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No session file, starting fresh");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let store: SessionStore = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))?;

        debug!(path = %path.display(), sessions = store.len(), "Loaded chat sessions");
        Ok(store)
    }

    /// Like `load`, but a file that does not parse is renamed to
    /// `<name>.corrupt-<timestamp>` and an empty store is returned, so the
    /// next `save` cannot overwrite it. Read failures are still errors.
    pub fn load_or_quarantine(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(store) => Ok(store),
            Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => {
                let aside = quarantine_path(path);
                fs::rename(path, &aside).with_context(|| {
                    format!("Failed to move corrupt session file aside: {}", path.display())
                })?;
                warn!(
                    error = %e,
                    path = %path.display(),
                    moved_to = %aside.display(),
                    "Session file is corrupt, starting fresh"
                );
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Write the store to disk, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize sessions")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;

        info!(path = %path.display(), sessions = self.len(), "Saved chat sessions");
        Ok(())
    }
}

fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3f")));
    path.with_file_name(name)
}
