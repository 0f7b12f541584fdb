use std::fmt::Display;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

///
/// A parsed timestamp, normalized to ISO 8601 on output
///
/// Inputs with an explicit timezone offset stay zoned; inputs without one stay
/// naive instead of being coerced to UTC, so the rendered text never claims an
/// offset the source did not carry.
///
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "content")]
pub enum Timestamp {
    /// Date-time with an explicit timezone offset
    Zoned(DateTime<FixedOffset>),
    /// Date-time without timezone information
    Naive(NaiveDateTime),
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
            Timestamp::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

///
/// Parse a free-form timestamp string, trying multiple formats
///
/// # Supported Formats (in order of precedence)
/// 1. Custom format (if provided) - tried both with timezone and as naive
/// 2. RFC 3339: `2023-10-06T09:30:21+00:00`
/// 3. ISO 8601 with offset (no colon): `2023-10-06T09:30:21+0000`
/// 4. RFC 2822: `Fri, 06 Oct 2023 09:30:21 +0000`
/// 5. Naive datetime with fractional seconds: `2023-10-06 09:30:21.890421`
/// 6. Naive ISO 8601 with fractional: `2023-10-06T09:30:21.348555`
/// 7. Naive datetime without seconds: `2023-10-06 09:30` / `2023-10-06T09:30`
/// 8. Naive with UTC suffix: `2023-10-06 09:30:21 UTC` (treated as +00:00)
/// 9. Bare dates: `2023-10-06`, `06.10.2023`, `06/10/2023` (midnight, naive)
/// 10. GMT format: `Mon Apr 03 2023 12:08:18 GMT+0200 (...)`
///
pub fn parse_timestamp<'a>(
    time: &'a str,
    custom_format: Option<&'a str>,
) -> Result<Timestamp, &'a str> {
    // Try custom date format first if provided
    if let Some(date_format) = custom_format {
        if let Ok(dt) = DateTime::parse_from_str(time, date_format) {
            return Ok(Timestamp::Zoned(dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, date_format) {
            return Ok(Timestamp::Naive(dt));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Ok(Timestamp::Zoned(dt));
    }

    // Offset without colon (e.g., +0000)
    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(Timestamp::Zoned(dt));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(time) {
        return Ok(Timestamp::Zoned(dt));
    }

    // Space-separated, e.g. "2023-10-06 09:30:21.890421"
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%F %T%.f") {
        return Ok(Timestamp::Naive(dt));
    }

    // Covers both "2024-10-02T07:55:15.348555" and "2022-01-09T15:00:00"
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%FT%T%.f") {
        return Ok(Timestamp::Naive(dt));
    }

    // Without seconds
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%F %H:%M") {
        return Ok(Timestamp::Naive(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%FT%H:%M") {
        return Ok(Timestamp::Naive(dt));
    }

    // Explicit UTC suffix
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%F %T UTC") {
        return Ok(Timestamp::Zoned(dt.and_utc().into()));
    }

    // Bare dates (midnight, naive)
    for date_format in ["%F", "%d.%m.%Y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(time, date_format) {
            return Ok(Timestamp::Naive(d.and_time(NaiveTime::MIN)));
        }
    }

    // Some logs have this date: "Mon Apr 03 2023 12:08:18 GMT+0200 (Mitteleuropäische Sommerzeit)"
    // Below ignores the first "Mon " part (%Z), parses the rest and then the timezone (+0200);
    // the remainder of the input is ignored
    if let Ok((dt, _)) = DateTime::parse_and_remainder(time, "%Z %b %d %Y %T GMT%z") {
        return Ok(Timestamp::Zoned(dt));
    }

    Err("unexpected timestamp format")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_keeps_offset() {
        let ts = parse_timestamp("2023-10-06T09:30:21+02:00", None).unwrap();
        assert_eq!(ts.to_string(), "2023-10-06T09:30:21+02:00");
    }

    #[test]
    fn test_naive_stays_naive() {
        let ts = parse_timestamp("2023-10-06T09:30:21", None).unwrap();
        assert_eq!(ts.to_string(), "2023-10-06T09:30:21");
    }

    #[test]
    fn test_naive_fractional() {
        let ts = parse_timestamp("2023-10-06 09:30:21.890421", None).unwrap();
        assert_eq!(ts.to_string(), "2023-10-06T09:30:21.890421");
    }

    #[test]
    fn test_bare_date() {
        let ts = parse_timestamp("2023-10-06", None).unwrap();
        assert_eq!(ts.to_string(), "2023-10-06T00:00:00");
    }

    #[test]
    fn test_dotted_date() {
        let ts = parse_timestamp("06.10.2023", None).unwrap();
        assert_eq!(ts.to_string(), "2023-10-06T00:00:00");
    }

    #[test]
    fn test_utc_suffix_is_zoned() {
        let ts = parse_timestamp("2023-10-06 09:30:21 UTC", None).unwrap();
        assert_eq!(ts.to_string(), "2023-10-06T09:30:21+00:00");
    }

    #[test]
    fn test_custom_format() {
        let ts = parse_timestamp("06/10/2023 09:30:21", Some("%d/%m/%Y %H:%M:%S")).unwrap();
        assert_eq!(ts.to_string(), "2023-10-06T09:30:21");
    }

    #[test]
    fn test_gmt_format() {
        let result = parse_timestamp(
            "Mon Apr 03 2023 12:08:18 GMT+0200 (Mitteleuropäische Sommerzeit)",
            None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_garbage_fails() {
        assert!(parse_timestamp("first of never", None).is_err());
    }
}
