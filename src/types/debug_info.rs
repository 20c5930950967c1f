use serde::{Deserialize, Serialize};

/// Diagnostics reported by `GET /api/debug`.
///
/// Every field is optional so that older or trimmed-down backends still parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Whether the backend has a model-provider API key configured.
    #[serde(default)]
    pub has_key: Option<bool>,

    /// Chat model the backend is configured to use.
    #[serde(default)]
    pub models_env: Option<String>,

    /// Embedding model the backend is configured to use.
    #[serde(default)]
    pub embed_model: Option<String>,

    /// Number of books in the backend's source catalog.
    #[serde(default)]
    pub books_count: Option<u64>,

    /// Number of documents in the backend's vector store.
    #[serde(default)]
    pub db_count: Option<u64>,
}
