//! The seam between the chat session and the recommendation service.
//!
//! [`ChatSession`](crate::chat::ChatSession) talks to the service only through
//! the [`Backend`] trait.  [`LibrarianClient`](crate::LibrarianClient) is the
//! HTTP implementation; tests substitute their own.

use crate::error::Result;
use crate::types::{DebugInfo, HealthStatus, Recommendation, SeedStatus};

/// Operations the chat session needs from the recommendation service.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Ask for a recommendation for `query`.
    ///
    /// Non-success statuses, unreachable hosts, timeouts and non-JSON bodies
    /// are all errors.  A JSON body without a usable `message` is not an
    /// error; it yields a [`Recommendation`] whose `text()` is `None`.
    async fn recommend(&self, query: &str) -> Result<Recommendation>;

    /// Ping the seed endpoint.
    async fn seed(&self) -> Result<SeedStatus>;

    /// Ping the health endpoint.
    async fn health(&self) -> Result<HealthStatus>;

    /// Fetch backend diagnostics.
    async fn debug_info(&self) -> Result<DebugInfo>;
}
