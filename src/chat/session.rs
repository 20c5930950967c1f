//! Core chat session management.
//!
//! This module provides the `ChatSession` struct, the one controller every
//! front end binds to.  It owns the transcript, gates submission on the
//! request lifecycle, and turns backend answers and failures into assistant
//! turns.

use std::fmt;
use std::path::Path;

use crate::backend::Backend;
use crate::chat::transcript::Transcript;
use crate::error::{Error, Result};
use crate::observability::{
    PROBE_OFFLINE, PROBE_ONLINE, SESSION_FAILURES, SESSION_FALLBACKS, SESSION_QUERIES,
    SESSION_REJECTED,
};
use crate::types::{DebugInfo, HealthStatus, Recommendation, Turn};

/// Assistant reply when the backend answered without a usable message.
pub const NO_MATCH_FALLBACK: &str = "Sorry, I couldn't find a good match.";

/// Assistant reply when the request failed for any reason.
pub const CONNECTIVITY_ERROR: &str =
    "I couldn't reach the server. Please verify your backend and API key, then try again.";

/// Lifecycle of the single outstanding recommendation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    /// No request in flight; submissions are accepted.
    #[default]
    Idle,
    /// A request has been dispatched and has not settled.
    Awaiting,
}

/// Backend availability as reported by the seed probe.
///
/// Display-only; it never gates submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reachability {
    /// The probe has not completed.
    #[default]
    Unknown,
    /// The probe got a well-formed `{"ok": true}`.
    Online,
    /// The probe failed in any way.
    Offline,
}

impl Reachability {
    /// Returns the tri-state as an optional boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Reachability::Unknown => None,
            Reachability::Online => Some(true),
            Reachability::Offline => Some(false),
        }
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reachability::Unknown => write!(f, "Unknown"),
            Reachability::Online => write!(f, "Online"),
            Reachability::Offline => write!(f, "Offline"),
        }
    }
}

/// A dispatched query that has not yet been settled.
///
/// Returned by [`ChatSession::begin_query`] and consumed by
/// [`ChatSession::settle`], so each user turn is answered exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending query must be settled or the session stays awaiting"]
pub struct PendingQuery {
    query: String,
}

impl PendingQuery {
    /// The text that was appended as the user turn and must be sent.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The number of turns in the transcript, including the greeting.
    pub turn_count: usize,
    /// The current request state.
    pub request_state: RequestState,
    /// The result of the seed probe.
    pub reachability: Reachability,
    /// Catalog size reported by the seed probe, if any.
    pub seed_count: Option<u64>,
    /// Number of queries dispatched.
    pub queries_sent: u64,
    /// Number of queries answered with the no-match fallback.
    pub fallbacks: u64,
    /// Number of queries that failed.
    pub failures: u64,
    /// Rendered form of the most recent failure, if any.
    pub last_error: Option<String>,
}

/// A chat session that manages conversation state and backend interactions.
pub struct ChatSession<B: Backend> {
    backend: B,
    transcript: Transcript,
    pending_input: String,
    request_state: RequestState,
    reachability: Reachability,
    probed: bool,
    seed_count: Option<u64>,
    last_error: Option<Error>,
    last_recommendation: Option<Recommendation>,
    queries_sent: u64,
    fallbacks: u64,
    failures: u64,
}

impl<B: Backend> ChatSession<B> {
    /// Creates a new session whose transcript holds only the greeting.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            pending_input: String::new(),
            request_state: RequestState::Idle,
            reachability: Reachability::Unknown,
            probed: false,
            seed_count: None,
            last_error: None,
            last_recommendation: None,
            queries_sent: 0,
            fallbacks: 0,
            failures: 0,
        }
    }

    /// Probes the seed endpoint and records reachability.
    ///
    /// Only the first call talks to the backend; later calls return the
    /// recorded result.
    pub async fn probe_backend(&mut self) -> Reachability {
        if self.probed {
            return self.reachability;
        }
        self.probed = true;
        self.reachability = match self.backend.seed().await {
            Ok(status) if status.ok => {
                self.seed_count = status.count;
                PROBE_ONLINE.click();
                Reachability::Online
            }
            Ok(_) => {
                PROBE_OFFLINE.click();
                tracing::info!("seed probe reported failure");
                Reachability::Offline
            }
            Err(err) => {
                PROBE_OFFLINE.click();
                tracing::info!(error = %err, "seed probe failed");
                Reachability::Offline
            }
        };
        self.reachability
    }

    /// Replaces the unsent input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Returns the unsent input text.
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Starts a query for `text`.
    ///
    /// Appends the trimmed text as a user turn, clears the pending input and
    /// moves to [`RequestState::Awaiting`].  Returns `None`, changing nothing,
    /// when the trimmed text is empty or a request is already in flight.
    pub fn begin_query(&mut self, text: &str) -> Option<PendingQuery> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        if self.request_state == RequestState::Awaiting {
            SESSION_REJECTED.click();
            tracing::debug!("query rejected while awaiting a response");
            return None;
        }
        self.transcript.push(Turn::user(query));
        self.request_state = RequestState::Awaiting;
        self.pending_input.clear();
        self.queries_sent = self.queries_sent.saturating_add(1);
        SESSION_QUERIES.click();
        Some(PendingQuery {
            query: query.to_string(),
        })
    }

    /// Settles a query with the backend's outcome.
    ///
    /// Appends exactly one assistant turn and returns to
    /// [`RequestState::Idle`].
    pub fn settle(&mut self, pending: PendingQuery, outcome: Result<Recommendation>) -> &Turn {
        let content = match outcome {
            Ok(recommendation) => {
                let content = match recommendation.text() {
                    Some(text) => text.to_string(),
                    None => {
                        self.fallbacks = self.fallbacks.saturating_add(1);
                        SESSION_FALLBACKS.click();
                        tracing::info!(query = pending.query(), "no usable message in response");
                        NO_MATCH_FALLBACK.to_string()
                    }
                };
                if let Some(title) = recommendation.chosen_title.as_deref() {
                    tracing::debug!(title, "backend chose a title");
                }
                self.last_recommendation = Some(recommendation);
                content
            }
            Err(err) => {
                self.failures = self.failures.saturating_add(1);
                SESSION_FAILURES.click();
                tracing::warn!(
                    query = pending.query(),
                    status = ?err.status_code(),
                    detail = ?err.detail(),
                    error = %err,
                    "recommendation failed"
                );
                self.last_error = Some(err);
                CONNECTIVITY_ERROR.to_string()
            }
        };
        self.request_state = RequestState::Idle;
        self.transcript.push(Turn::assistant(content))
    }

    /// Submits `text`: begins a query, awaits the backend and settles.
    ///
    /// Returns the assistant turn, or `None` if the submission was ignored.
    pub async fn submit_query(&mut self, text: &str) -> Option<&Turn> {
        let pending = self.begin_query(text)?;
        let outcome = self.backend.recommend(pending.query()).await;
        Some(self.settle(pending, outcome))
    }

    /// Submits the pending input.
    pub async fn submit(&mut self) -> Option<&Turn> {
        let text = self.pending_input.clone();
        self.submit_query(&text).await
    }

    /// Asks the backend's health endpoint.  Does not change reachability.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.backend.health().await
    }

    /// Fetches backend diagnostics.
    pub async fn debug_info(&self) -> Result<DebugInfo> {
        self.backend.debug_info().await
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the current request state.
    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    /// Returns true while a request is in flight.
    pub fn is_awaiting(&self) -> bool {
        self.request_state == RequestState::Awaiting
    }

    /// Returns the recorded reachability.
    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    /// Returns the most recent request failure, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Returns the most recent successful recommendation, if any.
    pub fn last_recommendation(&self) -> Option<&Recommendation> {
        self.last_recommendation.as_ref()
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Saves the transcript to the specified path.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.transcript.save_to(path)
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            turn_count: self.transcript.len(),
            request_state: self.request_state,
            reachability: self.reachability,
            seed_count: self.seed_count,
            queries_sent: self.queries_sent,
            fallbacks: self.fallbacks,
            failures: self.failures,
            last_error: self.last_error.as_ref().map(|err| err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::chat::transcript::GREETING;
    use crate::types::{Role, SeedStatus};

    #[derive(Default)]
    struct ScriptedBackend {
        recommendations: Mutex<VecDeque<Result<Recommendation>>>,
        seed: Mutex<Option<Result<SeedStatus>>>,
        queries: Mutex<Vec<String>>,
        seed_calls: Mutex<u32>,
    }

    impl ScriptedBackend {
        fn answering(outcome: Result<Recommendation>) -> Self {
            let backend = Self::default();
            backend.recommendations.lock().unwrap().push_back(outcome);
            backend
        }

        fn seeding(outcome: Result<SeedStatus>) -> Self {
            let backend = Self::default();
            *backend.seed.lock().unwrap() = Some(outcome);
            backend
        }
    }

    #[async_trait::async_trait]
    impl Backend for ScriptedBackend {
        async fn recommend(&self, query: &str) -> Result<Recommendation> {
            self.queries.lock().unwrap().push(query.to_string());
            self.recommendations
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::connection("no scripted answer", None)))
        }

        async fn seed(&self) -> Result<SeedStatus> {
            *self.seed_calls.lock().unwrap() += 1;
            self.seed
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(Error::connection("no scripted seed", None)))
        }

        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus { ok: true })
        }

        async fn debug_info(&self) -> Result<DebugInfo> {
            Ok(DebugInfo::default())
        }
    }

    fn message(text: &str) -> Result<Recommendation> {
        Ok(Recommendation {
            message: Some(text.to_string()),
            ..Recommendation::default()
        })
    }

    #[test]
    fn new_session_has_greeting_only() {
        let session = ChatSession::new(ScriptedBackend::default());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().turns()[0].content, GREETING);
        assert_eq!(session.request_state(), RequestState::Idle);
        assert_eq!(session.reachability(), Reachability::Unknown);
        assert!(session.pending_input().is_empty());
    }

    #[tokio::test]
    async fn successful_query_appends_two_turns() {
        let mut session = ChatSession::new(ScriptedBackend::answering(message("Try 'Dune'.")));
        let turn = session.submit_query("desert politics").await.unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "Try 'Dune'.");

        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1], Turn::user("desert politics"));
        assert_eq!(turns[2], Turn::assistant("Try 'Dune'."));
        assert!(!session.is_awaiting());
    }

    #[tokio::test]
    async fn query_is_trimmed_before_sending() {
        let mut session = ChatSession::new(ScriptedBackend::answering(message("ok")));
        session.submit_query("  war & loss \n").await.unwrap();
        assert_eq!(
            *session.backend().queries.lock().unwrap(),
            vec!["war & loss".to_string()]
        );
        assert_eq!(session.transcript().turns()[1].content, "war & loss");
    }

    #[tokio::test]
    async fn empty_input_is_ignored() {
        let mut session = ChatSession::new(ScriptedBackend::default());
        assert!(session.submit_query("").await.is_none());
        session.set_input("   \t ");
        assert!(session.submit().await.is_none());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.pending_input(), "   \t ");
        assert!(session.backend().queries.lock().unwrap().is_empty());
    }

    #[test]
    fn second_query_rejected_while_awaiting() {
        let mut session = ChatSession::new(ScriptedBackend::default());
        let pending = session.begin_query("freedom").unwrap();
        assert!(session.is_awaiting());

        session.set_input("another one");
        assert!(session.begin_query("another one").is_none());
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.pending_input(), "another one");

        session.settle(pending, message("Try 'Brave New World'."));
        assert!(!session.is_awaiting());
        assert_eq!(session.transcript().len(), 3);
    }

    #[test]
    fn begin_clears_pending_input() {
        let mut session = ChatSession::new(ScriptedBackend::default());
        session.set_input("magic");
        let pending = session.begin_query("magic").unwrap();
        assert_eq!(pending.query(), "magic");
        assert!(session.pending_input().is_empty());
    }

    #[tokio::test]
    async fn missing_message_uses_fallback() {
        let mut session =
            ChatSession::new(ScriptedBackend::answering(Ok(Recommendation::default())));
        let turn = session.submit_query("something obscure").await.unwrap();
        assert_eq!(turn.content, NO_MATCH_FALLBACK);
        assert_eq!(session.stats().fallbacks, 1);
        assert_eq!(session.stats().failures, 0);
    }

    #[tokio::test]
    async fn empty_message_uses_fallback() {
        let mut session = ChatSession::new(ScriptedBackend::answering(message("")));
        let turn = session.submit_query("anything").await.unwrap();
        assert_eq!(turn.content, NO_MATCH_FALLBACK);
    }

    #[tokio::test]
    async fn whitespace_message_is_shown_verbatim() {
        let mut session = ChatSession::new(ScriptedBackend::answering(message("   ")));
        let turn = session.submit_query("anything").await.unwrap();
        assert_eq!(turn.content, "   ");
        assert_eq!(session.stats().fallbacks, 0);
    }

    #[tokio::test]
    async fn network_failure_uses_connectivity_error() {
        let mut session = ChatSession::new(ScriptedBackend::answering(Err(Error::connection(
            "connection refused",
            None,
        ))));
        let turn = session.submit_query("friendship").await.unwrap();
        assert_eq!(turn.content, CONNECTIVITY_ERROR);
        assert_eq!(session.request_state(), RequestState::Idle);
        assert!(session.last_error().unwrap().is_connection());
    }

    #[tokio::test]
    async fn server_detail_is_kept_out_of_transcript() {
        let mut session = ChatSession::new(ScriptedBackend::answering(Err(Error::api(
            500,
            Some("/api/recommend failed: quota".to_string()),
        ))));
        let turn = session.submit_query("magic").await.unwrap();
        assert_eq!(turn.content, CONNECTIVITY_ERROR);
        assert_eq!(
            session.last_error().and_then(Error::detail),
            Some("/api/recommend failed: quota")
        );
        assert!(
            session
                .stats()
                .last_error
                .unwrap()
                .contains("/api/recommend failed: quota")
        );
    }

    #[tokio::test]
    async fn session_usable_after_failure() {
        let backend = ScriptedBackend::default();
        {
            let mut queue = backend.recommendations.lock().unwrap();
            queue.push_back(Err(Error::timeout("slow", Some(60.0))));
            queue.push_back(message("Try 'The Hobbit'."));
        }
        let mut session = ChatSession::new(backend);
        session.submit_query("adventure").await.unwrap();
        let turn = session.submit_query("adventure again").await.unwrap();
        assert_eq!(turn.content, "Try 'The Hobbit'.");
        assert_eq!(session.transcript().len(), 5);
        assert_eq!(session.stats().queries_sent, 2);
    }

    #[tokio::test]
    async fn probe_online() {
        let mut session = ChatSession::new(ScriptedBackend::seeding(Ok(SeedStatus {
            ok: true,
            count: Some(10),
        })));
        assert_eq!(session.probe_backend().await, Reachability::Online);
        assert_eq!(session.reachability().to_string(), "Online");
        assert_eq!(session.stats().seed_count, Some(10));
    }

    #[tokio::test]
    async fn probe_reported_failure_is_offline() {
        let mut session = ChatSession::new(ScriptedBackend::seeding(Ok(SeedStatus {
            ok: false,
            count: None,
        })));
        assert_eq!(session.probe_backend().await, Reachability::Offline);
    }

    #[tokio::test]
    async fn probe_error_is_offline() {
        let mut session = ChatSession::new(ScriptedBackend::seeding(Err(Error::api(500, None))));
        assert_eq!(session.probe_backend().await, Reachability::Offline);
        assert_eq!(session.reachability().to_string(), "Offline");
        assert_eq!(session.reachability().as_bool(), Some(false));
    }

    #[tokio::test]
    async fn probe_fires_once() {
        let mut session = ChatSession::new(ScriptedBackend::seeding(Ok(SeedStatus {
            ok: true,
            count: None,
        })));
        session.probe_backend().await;
        assert_eq!(session.probe_backend().await, Reachability::Online);
        assert_eq!(*session.backend().seed_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn offline_backend_does_not_block_queries() {
        let backend = ScriptedBackend::answering(message("Try 'Matilda'."));
        let mut session = ChatSession::new(backend);
        assert_eq!(session.probe_backend().await, Reachability::Offline);
        let turn = session.submit_query("school").await.unwrap();
        assert_eq!(turn.content, "Try 'Matilda'.");
    }
}
