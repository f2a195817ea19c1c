use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::{AppError, Result};

/// Parses a restore point given as base-10 seconds since the Unix epoch.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let secs: i64 = input.trim().parse().map_err(|e: std::num::ParseIntError| {
        AppError::TimestampParse {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })?;

    DateTime::from_timestamp(secs, 0).ok_or_else(|| AppError::TimestampParse {
        input: input.to_string(),
        reason: "out of range".to_string(),
    })
}

/// RFC 3339 in UTC with second precision, e.g. `2024-03-01T12:00:00Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
