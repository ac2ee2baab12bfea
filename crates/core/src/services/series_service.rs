use chrono::TimeZone;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::chart::CumulativePoint;
use crate::models::record::TimestampedAmount;
use crate::models::timestamp::parse_timestamp;

/// Builds the cumulative XP series.
///
/// Pure business logic: no I/O, easy to test.
pub struct SeriesService;

impl SeriesService {
    pub fn new() -> Self {
        Self
    }

    /// Running total of `amount` over records in the order given.
    ///
    /// One point per record, timestamps copied verbatim. Every timestamp
    /// must parse in `tz`; the first one that does not fails the whole
    /// series.
    pub fn cumulative<Tz: TimeZone>(
        &self,
        records: &[TimestampedAmount],
        tz: &Tz,
    ) -> Result<Vec<CumulativePoint>, CoreError> {
        let mut total = 0.0;
        let mut points = Vec::with_capacity(records.len());
        for record in records {
            parse_timestamp(&record.created_at, tz)?;
            total += record.delta();
            points.push(CumulativePoint {
                timestamp: record.created_at.clone(),
                running_total: total,
            });
        }
        debug!(points = points.len(), total, "built cumulative series");
        Ok(points)
    }
}

impl Default for SeriesService {
    fn default() -> Self {
        Self::new()
    }
}
