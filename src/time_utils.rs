use chrono::{DateTime, NaiveDateTime, Utc};

/// Current timestamp in UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a record timestamp. The write path emits RFC 3339 with a zone
/// suffix, but older records carry a bare ISO-8601 local form — both must
/// parse. Bare timestamps are assumed UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
}
