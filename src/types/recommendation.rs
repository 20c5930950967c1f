use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /api/recommend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// The free-text query exactly as the user submitted it.
    pub query: String,
}

impl RecommendRequest {
    /// Create a new request for the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// A successful answer from `POST /api/recommend`.
///
/// Parsing is lenient: any JSON value is accepted and fields that are missing
/// or of the wrong type are simply `None`.  Only `message` ever reaches the
/// transcript; the remaining fields are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The recommendation text to show the user.
    pub message: Option<String>,

    /// The title the backend settled on, if it reported one.
    pub chosen_title: Option<String>,

    /// The long-form summary of the chosen title, if it reported one.
    pub full_summary: Option<String>,
}

impl Recommendation {
    /// Extract a recommendation from an arbitrary JSON payload.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        };
        Self {
            message: field("message"),
            chosen_title: field("chosen_title"),
            full_summary: field("full_summary"),
        }
    }

    /// Returns the message when it is present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}
