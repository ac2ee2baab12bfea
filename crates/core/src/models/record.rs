use serde::{Deserialize, Serialize};

/// One XP award as returned by the aggregated query.
///
/// The upstream query orders transactions by `createdAt` ascending; this
/// type does not re-check that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedAmount {
    /// Signed XP delta. Missing or `null` counts as 0.
    #[serde(default)]
    pub amount: Option<f64>,

    /// ISO-8601 creation time, kept verbatim
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl TimestampedAmount {
    pub fn new(amount: f64, created_at: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            created_at: created_at.into(),
        }
    }

    /// The delta this record contributes to a running total.
    pub fn delta(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

/// One audit (peer review) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    #[serde(rename = "createdAt")]
    pub created_at: String,

    #[serde(default)]
    pub grade: Option<f64>,
}

impl AuditEvent {
    pub fn new(created_at: impl Into<String>) -> Self {
        Self {
            created_at: created_at.into(),
            grade: None,
        }
    }
}
