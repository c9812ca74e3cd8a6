use chrono::{DateTime, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_unix_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a millisecond Unix timestamp as RFC 3339 (UTC).
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
