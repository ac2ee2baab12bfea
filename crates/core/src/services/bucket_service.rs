use chrono::TimeZone;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::chart::MonthBucketMap;
use crate::models::record::AuditEvent;
use crate::models::timestamp::{month_key, parse_timestamp};

/// Groups audits by calendar month.
pub struct BucketService;

impl BucketService {
    pub fn new() -> Self {
        Self
    }

    /// Count audits per `"YYYY-MM"` month of their creation date in `tz`.
    ///
    /// Fails on the first unparseable timestamp; no partial map is returned.
    /// Months without audits are absent, not zero.
    pub fn per_month<Tz: TimeZone>(
        &self,
        audits: &[AuditEvent],
        tz: &Tz,
    ) -> Result<MonthBucketMap, CoreError> {
        let mut buckets = MonthBucketMap::new();
        for audit in audits {
            let local = parse_timestamp(&audit.created_at, tz)?;
            *buckets.entry(month_key(&local)).or_insert(0) += 1;
        }
        debug!(audits = audits.len(), months = buckets.len(), "bucketed audits by month");
        Ok(buckets)
    }
}

impl Default for BucketService {
    fn default() -> Self {
        Self::new()
    }
}
