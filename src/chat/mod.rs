//! Chat module - talking to agent pages
//!
//! Each agent page posts a prompt to its own fixed endpoint and shows the
//! reply with a typewriter reveal. History is kept per page in an explicit
//! session store.
//!
//! # Module Structure
//!
//! - `model` - Messages and roles
//! - `client` - HTTP transport, endpoint resolution, reply decoding
//! - `session` - Per-page session history and persistence
//! - `typewriter` - Word-by-word reveal of a reply

mod client;
mod model;
mod session;
mod typewriter;

pub use client::{
    decode_reply, AgentEndpoint, AgentTransport, ChatClient, ChatError, ChatReply,
    CHAT_FAILURE_MESSAGE,
};
pub use model::{ChatMessage, MessageRole, SessionId};
pub use session::{ChatSession, SessionStore};
pub use typewriter::Typewriter;
