//! HTTP client for agent pages
//!
//! Each agent is a fixed endpoint that takes one form field (`prompt`) and a
//! bearer token. Replies come in one of two JSON shapes:
//!
//! ```text
//! {"response": "..."}
//! [{"answer": "...", "summary": "..."}]
//! ```
//!
//! Requests are single-shot: no retry, no queue.

use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::logging::log_chat_event;

/// Generic message shown for every failed exchange
pub const CHAT_FAILURE_MESSAGE: &str = "Error while calling the SnapLogic API";

/// Errors from a chat round-trip
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Agent returned HTTP {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response format from API: {0}")]
    MalformedResponse(String),

    #[error("No agent endpoint configured for '{0}'")]
    MissingEndpoint(String),

    #[error("No bearer token configured for '{0}'")]
    MissingToken(String),
}

impl ChatError {
    /// What the user sees; request details only go to the log
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingEndpoint(page) | Self::MissingToken(page) => {
                format!("The agent behind {} is not configured", page)
            }
            _ => CHAT_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// A decoded agent reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    pub summary: Option<String>,
}

/// Decode either supported reply shape
pub fn decode_reply(value: &Value) -> Result<ChatReply, ChatError> {
    match value {
        Value::Object(map) => match map.get("response") {
            Some(Value::String(answer)) => Ok(ChatReply {
                answer: answer.clone(),
                summary: None,
            }),
            Some(other) => Err(ChatError::MalformedResponse(format!(
                "'response' is not a string: {}",
                other
            ))),
            None => Err(ChatError::MalformedResponse(
                "object without a 'response' field".to_string(),
            )),
        },
        Value::Array(items) => {
            let Some(Value::Object(first)) = items.first() else {
                return Err(ChatError::MalformedResponse(
                    "expected a non-empty array of objects".to_string(),
                ));
            };
            let field = |name: &str| first.get(name).and_then(Value::as_str).unwrap_or("");
            let summary = field("summary");
            Ok(ChatReply {
                answer: field("answer").to_string(),
                summary: (!summary.is_empty()).then(|| summary.to_string()),
            })
        }
        other => Err(ChatError::MalformedResponse(format!(
            "unexpected JSON value: {}",
            other
        ))),
    }
}

/// Anything that can answer a prompt for one agent page
pub trait AgentTransport {
    fn send(&self, prompt: &str) -> Result<ChatReply, ChatError>;
}

/// Resolved connection details for one agent page
#[derive(Clone, PartialEq, Eq)]
pub struct AgentEndpoint {
    pub url: String,
    pub bearer_token: String,
    pub timeout: Duration,
    pub verify_tls: bool,
    /// Typewriter speed for replies from this agent, words per second
    pub typewriter_speed: u32,
}

impl std::fmt::Debug for AgentEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentEndpoint")
            .field("url", &self.url)
            .field("bearer_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("typewriter_speed", &self.typewriter_speed)
            .finish()
    }
}

impl AgentEndpoint {
    /// Look up the endpoint for a page filename
    pub fn from_config(page: &str, config: &Config) -> Result<Self, ChatError> {
        let agent = config
            .get_agent(page)
            .ok_or_else(|| ChatError::MissingEndpoint(page.to_string()))?;
        let bearer_token = agent
            .resolve_token()
            .ok_or_else(|| ChatError::MissingToken(page.to_string()))?;
        let chat = config.get_chat();

        Ok(Self {
            url: agent.url.clone(),
            bearer_token,
            timeout: agent
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| chat.timeout()),
            verify_tls: chat.verify_tls,
            typewriter_speed: agent.typewriter_speed.unwrap_or(chat.typewriter_speed),
        })
    }
}

/// Blocking `ureq` client bound to one endpoint
pub struct ChatClient {
    page: String,
    endpoint: AgentEndpoint,
    agent: ureq::Agent,
}

impl ChatClient {
    pub fn new(page: impl Into<String>, endpoint: AgentEndpoint) -> Self {
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(!endpoint.verify_tls)
            .build();
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(endpoint.timeout))
            .http_status_as_error(false)
            .tls_config(tls)
            .build();

        Self {
            page: page.into(),
            agent: ureq::Agent::new_with_config(config),
            endpoint,
        }
    }

    fn post(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        debug!(
            page = %self.page,
            url = %self.endpoint.url,
            prompt_len = prompt.len(),
            "Sending prompt to agent"
        );

        let response = self
            .agent
            .post(self.endpoint.url.as_str())
            .header(
                "Authorization",
                &format!("Bearer {}", self.endpoint.bearer_token),
            )
            .send_form([("prompt", prompt)])
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ChatError::Status(status));
        }

        let body: Value = response
            .into_body()
            .read_json()
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        decode_reply(&body)
    }
}

impl AgentTransport for ChatClient {
    fn send(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        let start = Instant::now();
        let result = self.post(prompt);
        let duration_ms = start.elapsed().as_millis() as u64;

        if let Err(e) = &result {
            warn!(page = %self.page, error = %e, "Agent request failed");
        }
        log_chat_event(&self.page, "send", Some(duration_ms), result.is_ok());
        result
    }
}
