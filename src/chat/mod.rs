//! Chat application module for conversations with the Smart Librarian.
//!
//! This module provides the session controller and a REPL front end built on
//! top of the HTTP client.  It supports:
//!
//! - A single outstanding recommendation request per session
//! - A startup seed probe reporting backend availability
//! - ANSI-styled output with an opt-out
//! - Slash commands for session inspection
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The session controller and request lifecycle
//! - [`transcript`]: The append-only conversation record
//! - [`commands`]: Slash command parsing
//! - [`render`]: Terminal output

mod commands;
mod config;
mod render;
mod session;
mod transcript;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use render::{PlainTextRenderer, Renderer};
pub use session::{
    CONNECTIVITY_ERROR, ChatSession, NO_MATCH_FALLBACK, PendingQuery, Reachability, RequestState,
    SessionStats,
};
pub use transcript::{GREETING, Transcript};
