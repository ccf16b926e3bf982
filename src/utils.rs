use chrono::{NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::Serializer;

/// Timestamps are stored as UTC without a zone; they go out as RFC 3339
/// with millisecond precision.
pub fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = Utc
        .from_utc_datetime(date)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
