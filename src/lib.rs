//! Agent Portal - demo catalogue and chat client for AI agent pages
//!
//! This library scans a directory of agent demo pages, builds a searchable
//! catalogue from their filenames and declared metadata, and forwards chat
//! prompts to each page's agent endpoint.

pub mod catalogue;
pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata_parser;
pub mod render;
