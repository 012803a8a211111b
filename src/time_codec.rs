//! Timestamp formats used by the service.
//!
//! Samples arrive as `YYYY-MM-DDTHH:MM:SSZ` and are shown to API callers as
//! `YYYY-MM-DD HH:MM:SS`. Both are UTC wall-clock; no offsets are applied.

use chrono::NaiveDateTime;
use thiserror::Error;

pub const INGEST_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed timestamp {input:?}: expected {expected}")]
pub struct MalformedTimestamp {
    pub input: String,
    pub expected: &'static str,
}

pub fn parse_ingest(s: &str) -> Result<NaiveDateTime, MalformedTimestamp> {
    parse_strict(s, b'T', Some(b'Z'), INGEST_FORMAT, "YYYY-MM-DDTHH:MM:SSZ")
}

pub fn parse_display(s: &str) -> Result<NaiveDateTime, MalformedTimestamp> {
    parse_strict(s, b' ', None, DISPLAY_FORMAT, "YYYY-MM-DD HH:MM:SS")
}

pub fn format_display(t: &NaiveDateTime) -> String {
    t.format(DISPLAY_FORMAT).to_string()
}

pub fn format_ingest(t: &NaiveDateTime) -> String {
    t.format(INGEST_FORMAT).to_string()
}

/// chrono accepts unpadded fields and surrounding variations, so the byte
/// layout is checked before handing the string over for calendar validation.
fn parse_strict(
    s: &str,
    date_time_sep: u8,
    suffix: Option<u8>,
    format: &str,
    expected: &'static str,
) -> Result<NaiveDateTime, MalformedTimestamp> {
    let err = || MalformedTimestamp {
        input: s.to_string(),
        expected,
    };

    let bytes = s.as_bytes();
    let body_len = 19;
    let total_len = body_len + usize::from(suffix.is_some());
    if bytes.len() != total_len {
        return Err(err());
    }

    for (i, b) in bytes[..body_len].iter().enumerate() {
        let ok = match i {
            4 | 7 => *b == b'-',
            10 => *b == date_time_sep,
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return Err(err());
        }
    }

    if let Some(tail) = suffix {
        if bytes[body_len] != tail {
            return Err(err());
        }
    }

    // chrono reads second 60 as a leap second; neither format allows it.
    if &bytes[17..19] > b"59".as_slice() {
        return Err(err());
    }

    NaiveDateTime::parse_from_str(s, format).map_err(|_| err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_both_formats_to_same_instant() {
        let ingest = parse_ingest("2023-01-01T01:00:00Z").unwrap();
        let display = parse_display("2023-01-01 01:00:00").unwrap();
        assert_eq!(ingest, display);
        assert_eq!(ingest, at(2023, 1, 1, 1, 0, 0));
    }

    #[test]
    fn formats_display_and_ingest() {
        let t = at(2023, 1, 1, 1, 0, 0);
        assert_eq!(format_display(&t), "2023-01-01 01:00:00");
        assert_eq!(format_ingest(&t), "2023-01-01T01:00:00Z");
    }

    #[test]
    fn rejects_layout_deviations() {
        for bad in [
            "",
            "2023-01-01T01:00:00",
            "2023-01-01 01:00:00Z",
            "2023-1-01T01:00:00Z",
            "2023-01-01T01:00:00+00:00",
            "2023-01-01T01:00:0aZ",
            "2023/01/01T01:00:00Z",
            " 2023-01-01T01:00:00Z",
        ] {
            assert!(parse_ingest(bad).is_err(), "accepted {bad:?}");
        }

        for bad in [
            "2023-01-01T01:00:00",
            "2023-01-01 1:00:00",
            "2023-01-01 01:00:00 ",
            "2023-01-01 00:00:60",
        ] {
            assert!(parse_display(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_invalid_calendar_values() {
        for bad in [
            "2023-13-01T00:00:00Z",
            "2023-02-30T00:00:00Z",
            "2023-01-01T24:00:00Z",
            "2023-01-01T00:60:00Z",
            "2023-01-01T00:00:60Z",
            "2023-01-01T12:34:60Z",
        ] {
            let err = parse_ingest(bad).unwrap_err();
            assert_eq!(err.input, bad);
        }
    }

    #[test]
    fn rejects_leap_second() {
        assert!(parse_ingest("2016-12-31T23:59:60Z").is_err());
        assert!(parse_display("2023-06-15 08:00:60").is_err());
        assert!(parse_display("2023-06-15 08:00:59").is_ok());
    }

    #[test]
    fn accepts_leap_day() {
        assert_eq!(
            parse_display("2024-02-29 12:30:45").unwrap(),
            at(2024, 2, 29, 12, 30, 45)
        );
    }
}
