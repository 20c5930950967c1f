//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling the chat client.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::LibrarianClient;
use crate::error::Result;

/// Default per-request timeout, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the smart-librarian tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the backend.
    #[arrrg(
        optional,
        "Backend base URL (default: $SMART_LIBRARIAN_URL or http://127.0.0.1:8000)",
        "URL"
    )]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Skip the startup seed probe.
    #[arrrg(flag, "Do not probe the backend at startup")]
    pub no_probe: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend base URL; `None` defers to the environment and then the default.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to probe the seed endpoint when the session starts.
    pub probe_on_start: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from the environment, else `http://127.0.0.1:8000`
    /// - Timeout: 60 seconds
    /// - Color: enabled
    /// - Probe: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
            probe_on_start: true,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Disables the startup seed probe.
    pub fn without_probe(mut self) -> Self {
        self.probe_on_start = false;
        self
    }

    /// Builds the HTTP client this configuration describes.
    pub fn client(&self) -> Result<LibrarianClient> {
        LibrarianClient::with_options(self.base_url.clone(), Some(self.timeout))
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            base_url: args.base_url,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            use_color: !args.no_color,
            probe_on_start: !args.no_probe,
        }
    }
}
