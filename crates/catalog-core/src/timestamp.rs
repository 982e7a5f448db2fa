//! Extended-JSON date encoding for document timestamps.
//!
//! Document stores expect dates wrapped as `{"$date": "2024-05-01T12:00:00.000Z"}`
//! rather than bare strings. Use with `#[serde(with = "crate::timestamp")]`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct ExtendedDate {
    #[serde(rename = "$date")]
    date: String,
}

/// Formats `value` as RFC 3339 UTC with millisecond precision and a `Z` suffix.
#[must_use]
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// # Errors
///
/// Propagates the serializer's error.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    ExtendedDate {
        date: format(value),
    }
    .serialize(serializer)
}

/// # Errors
///
/// Fails when the input is not a `{"$date": ...}` object or the date string
/// is not valid RFC 3339.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let ExtendedDate { date } = ExtendedDate::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&date)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}
