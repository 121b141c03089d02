use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse RFC 3339 (`2026-03-29T18:30:00+02:00`) or a naive
/// `2026-03-29T18:30:00`, which is taken as UTC.
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|t| t.and_utc())
}

/// Serde adapter for [`parse_utc`]
pub fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {raw}")))
}

/// UTC instant as stored in a `timestamp without time zone` column
pub fn to_db_time(value: DateTime<Utc>) -> NaiveDateTime {
    value.naive_utc()
}

/// Column value read back as UTC
pub fn from_db_time(value: NaiveDateTime) -> DateTime<Utc> {
    value.and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_db_time_roundtrip_keeps_wall_clock() {
        let t = Utc.with_ymd_and_hms(2026, 3, 29, 18, 30, 0).unwrap();
        let stored = to_db_time(t);
        assert_eq!(stored.to_string(), "2026-03-29 18:30:00");
        assert_eq!(from_db_time(stored), t);
    }

    #[test]
    fn test_parse_utc_accepts_offset_and_naive() {
        let t = Utc.with_ymd_and_hms(2026, 3, 29, 16, 30, 0).unwrap();
        assert_eq!(parse_utc("2026-03-29T18:30:00+02:00"), Some(t));
        assert_eq!(parse_utc("2026-03-29T16:30:00Z"), Some(t));
        assert_eq!(parse_utc("2026-03-29T16:30:00"), Some(t));
        assert_eq!(parse_utc("2026-03-29 16:30:00"), Some(t));
        assert_eq!(parse_utc("2026-03-29T16:30"), Some(t));
        assert_eq!(parse_utc("yesterday"), None);
    }
}
