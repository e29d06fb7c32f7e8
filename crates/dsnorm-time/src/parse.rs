//! Timestamp parsing for attribute values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, TimeError};

/// Formats without an offset, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M",
];

/// Parses a timestamp into UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD[T ]hh:mm:ss[.fff]`, the basic
/// `YYYYMMDDThhmmss[Z]` form and a bare `YYYY-MM-DD` date (midnight).
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(TimeError::Unparseable {
        value: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn parses_supported_forms() {
        let expected = utc(2024, 1, 1, 6, 30, 0);
        for input in [
            "2024-01-01T06:30:00Z",
            "2024-01-01T08:30:00+02:00",
            "2024-01-01T06:30:00",
            "2024-01-01 06:30:00",
            "2024-01-01T06:30:00.000",
            "20240101T063000",
            "20240101T063000Z",
            " 2024-01-01T06:30Z ",
        ] {
            assert_eq!(parse_timestamp(input).unwrap(), expected, "{input}");
        }
        assert_eq!(parse_timestamp("2024-01-01").unwrap(), utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(TimeError::Unparseable {
                value: "yesterday".to_string()
            })
        );
        assert!(parse_timestamp("2024-02-30").is_err());
    }
}
