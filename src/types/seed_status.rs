use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The answer to `GET /api/seed`.
///
/// The backend seeds its catalog on first call and reports how many entries
/// it holds.  Anything other than a boolean `true` in `ok` counts as failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStatus {
    /// Whether the backend reported success.
    pub ok: bool,

    /// Number of catalog entries, when reported.
    pub count: Option<u64>,
}

impl SeedStatus {
    /// Extract a seed status from an arbitrary JSON payload.
    pub fn from_value(value: &Value) -> Self {
        Self {
            ok: value.get("ok").and_then(Value::as_bool).unwrap_or(false),
            count: value.get("count").and_then(Value::as_u64),
        }
    }
}

/// The answer to `GET /api/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Whether the backend reported itself healthy.
    pub ok: bool,
}

impl HealthStatus {
    /// Extract a health status from an arbitrary JSON payload.
    pub fn from_value(value: &Value) -> Self {
        Self {
            ok: value.get("ok").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}
