use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::errors::CoreError;

/// Formats accepted for timestamps that carry no UTC offset.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an API timestamp and express it in `tz`.
///
/// Accepted forms:
/// - RFC 3339 with an offset or `Z` (what the GraphQL engine emits)
/// - date and time without an offset, read as wall-clock time in `tz`
/// - a bare `YYYY-MM-DD`, read as midnight UTC
pub fn parse_timestamp<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<DateTime<Tz>, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_timestamp(value, "empty string"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(tz));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
                CoreError::invalid_timestamp(value, "wall-clock time does not exist in this zone")
            });
        }
    }

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => {
            let midnight = date.and_time(NaiveTime::MIN);
            Ok(Utc.from_utc_datetime(&midnight).with_timezone(tz))
        }
        Err(e) => Err(CoreError::invalid_timestamp(value, e.to_string())),
    }
}

/// `"YYYY-MM"` bucket key for a local date-time.
pub fn month_key<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{:04}-{:02}", dt.year(), dt.month())
}

/// `"MM/YY"` axis label for a local date-time.
pub fn month_label<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{:02}/{:02}", dt.month(), dt.year().rem_euclid(100))
}

/// `"MM/YY"` axis label for an existing `"YYYY-MM"` bucket key.
pub fn month_label_from_key(key: &str) -> Result<String, CoreError> {
    let (year, month) = key
        .split_once('-')
        .ok_or_else(|| CoreError::invalid_timestamp(key, "expected YYYY-MM"))?;
    let year: i32 = year
        .parse()
        .map_err(|_| CoreError::invalid_timestamp(key, "year is not a number"))?;
    let month: u32 = month
        .parse()
        .map_err(|_| CoreError::invalid_timestamp(key, "month is not a number"))?;
    if !(1..=12).contains(&month) {
        return Err(CoreError::invalid_timestamp(key, "month out of range"));
    }
    Ok(format!("{:02}/{:02}", month, year.rem_euclid(100)))
}
