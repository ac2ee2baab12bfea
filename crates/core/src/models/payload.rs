use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::record::{AuditEvent, TimestampedAmount};

// ── Aggregated query response types ─────────────────────────────────
//
// Shapes of the JSON document returned by the dashboard's single
// aggregated query. Fetching it (and authenticating) happens elsewhere;
// the core only reads the already-received body.

/// Top-level GraphQL response: `{ "data": ..., "errors": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardPayload {
    #[serde(default)]
    pub data: Option<PayloadData>,

    #[serde(default)]
    pub errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadData {
    #[serde(default)]
    pub user: Vec<UserRecord>,
}

/// The signed-in user with every collection the dashboard asks for.
///
/// Collections are `Option` so a missing key can be told apart from an
/// empty list (the former usually means the query was edited).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub login: Option<String>,

    #[serde(default)]
    pub campus: Option<String>,

    #[serde(default)]
    pub public: Option<PublicInfo>,

    #[serde(default, rename = "auditRatio")]
    pub audit_ratio: Option<f64>,

    /// XP transactions, ordered by `createdAt` ascending upstream
    #[serde(default)]
    pub transactions: Option<Vec<TimestampedAmount>>,

    #[serde(default)]
    pub transactions_aggregate: Option<XpAggregate>,

    #[serde(default)]
    pub audits: Option<Vec<AuditEvent>>,

    /// Cursus registrations; the first carries the current level
    #[serde(default)]
    pub events: Option<Vec<LevelEvent>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicInfo {
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,

    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelEvent {
    #[serde(default)]
    pub level: Option<u32>,
}

/// `transactions_aggregate { aggregate { sum { amount } } }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XpAggregate {
    #[serde(default)]
    pub aggregate: Option<AggregateBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregateBody {
    #[serde(default)]
    pub sum: Option<AggregateSum>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregateSum {
    #[serde(default)]
    pub amount: Option<f64>,
}

impl XpAggregate {
    pub fn total(&self) -> Option<f64> {
        self.aggregate.as_ref()?.sum.as_ref()?.amount
    }
}

impl DashboardPayload {
    /// Parse a response body and return its (first) user.
    ///
    /// A non-empty `errors` array wins over any partial `data`.
    pub fn from_json(json: &str) -> Result<UserRecord, CoreError> {
        let payload: DashboardPayload = serde_json::from_str(json)?;
        payload.into_user()
    }

    pub fn into_user(self) -> Result<UserRecord, CoreError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            return Err(CoreError::GraphQl(serde_json::to_string(&errors)?));
        }
        self.data
            .and_then(|d| d.user.into_iter().next())
            .ok_or(CoreError::UserNotFound)
    }
}

impl UserRecord {
    pub fn transactions(&self) -> &[TimestampedAmount] {
        self.transactions.as_deref().unwrap_or_default()
    }

    pub fn audits(&self) -> &[AuditEvent] {
        self.audits.as_deref().unwrap_or_default()
    }
}

/// Identity card shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub login: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub campus: Option<String>,
    pub level: Option<u32>,

    /// Aggregate XP sum, or the sum of listed transactions if the
    /// aggregate is absent
    pub total_xp: f64,

    pub audit_ratio: Option<f64>,
    pub transaction_count: usize,
    pub audit_count: usize,
}

impl StudentProfile {
    pub fn from_user(user: &UserRecord) -> Self {
        let public = user.public.clone().unwrap_or_default();
        let total_xp = user
            .transactions_aggregate
            .as_ref()
            .and_then(XpAggregate::total)
            .unwrap_or_else(|| user.transactions().iter().map(TimestampedAmount::delta).sum());

        Self {
            login: user.login.clone(),
            first_name: public.first_name,
            last_name: public.last_name,
            campus: user.campus.clone(),
            level: user
                .events
                .as_ref()
                .and_then(|events| events.first())
                .and_then(|e| e.level),
            total_xp,
            audit_ratio: user.audit_ratio,
            transaction_count: user.transactions().len(),
            audit_count: user.audits().len(),
        }
    }

    /// `"First Last"`, or the login when no public name is set.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.login.clone().unwrap_or_default()
        } else {
            parts.join(" ")
        }
    }
}
