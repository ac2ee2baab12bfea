use thiserror::Error;

/// Unified error type for the entire student-dashboard-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Empty or single-point inputs are not errors: renderers report them as
/// `ChartOutcome::InsufficientData` instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input records ───────────────────────────────────────────────
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid chart settings: {0}")]
    InvalidSettings(String),

    // ── Payload ─────────────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("GraphQL query failed: {0}")]
    GraphQl(String),

    #[error("No user found in payload")]
    UserNotFound,

    // ── Output ──────────────────────────────────────────────────────
    #[error("Render error: {0}")]
    Render(String),
}

impl CoreError {
    pub(crate) fn invalid_timestamp(value: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidTimestamp {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<std::fmt::Error> for CoreError {
    fn from(e: std::fmt::Error) -> Self {
        CoreError::Render(e.to_string())
    }
}
