use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{NeoError, NeoResult};

/// Timestamp layout used by the JPL close-approach API, e.g. `1900-Jan-01 00:11`
pub const CAD_DATETIME_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Minute-resolution layout used for display and serialization, e.g. `1900-01-01 00:11`
pub const OUTPUT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a close-approach timestamp into a UTC datetime
///
/// Accepts both the CAD API layout ([`CAD_DATETIME_FORMAT`]) and the numeric
/// layout produced by [`format_datetime`], so formatted output can be read back.
///
/// # Example
/// ```
/// use neo_rust::time::{format_datetime, parse_datetime};
///
/// let dt = parse_datetime("1900-Jan-01 00:11").unwrap();
/// assert_eq!(format_datetime(&dt), "1900-01-01 00:11");
/// ```
pub fn parse_datetime(raw: &str) -> NeoResult<DateTime<Utc>> {
    let trimmed = raw.trim();

    let naive = NaiveDateTime::parse_from_str(trimmed, CAD_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, OUTPUT_DATETIME_FORMAT))
        .map_err(|e| NeoError::InvalidTimestamp(format!("'{}': {}", raw, e)))?;

    Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Format a UTC datetime without seconds
///
/// The source data only carries minutes, so seconds would be noise.
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format(OUTPUT_DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_cad_layout() {
        let dt = parse_datetime("1900-Jan-01 00:11").unwrap();

        assert_eq!(dt.year(), 1900);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 11);
    }

    #[test]
    fn test_parse_numeric_layout() {
        let dt = parse_datetime("2020-12-31 23:59").unwrap();

        assert_eq!(dt.year(), 2020);
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.minute(), 59);
    }

    #[test]
    fn test_format_drops_seconds() {
        let dt = parse_datetime("2029-Apr-13 21:46").unwrap();
        assert_eq!(format_datetime(&dt), "2029-04-13 21:46");
    }

    #[test]
    fn test_numeric_roundtrip() {
        for raw in ["1900-01-01 12:00", "1999-07-04 00:00", "2178-Dec-31 23:59"] {
            let dt = parse_datetime(raw).unwrap();
            let reparsed = parse_datetime(&format_datetime(&dt)).unwrap();
            assert_eq!(dt, reparsed);
        }
        assert_eq!(
            format_datetime(&parse_datetime("1900-01-01 12:00").unwrap()),
            "1900-01-01 12:00"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "yesterday", "1900-13-01 00:00", "1900-Jan-01"] {
            let result = parse_datetime(raw);
            assert!(
                matches!(result, Err(NeoError::InvalidTimestamp(_))),
                "'{}' should not parse: {:?}",
                raw,
                result
            );
        }
    }
}
