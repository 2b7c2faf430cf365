//! Best-effort parsing of free-form date strings into Unix timestamps.
//!
//! Inputs without an explicit offset are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%B %d %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
    "%B %d %Y %I:%M %p",
    "%b %d %Y %I:%M %p",
    "%d %B %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parses a free-form date string into Unix seconds.
///
/// Accepts RFC 3339, RFC 2822 and a table of common numeric and
/// English month layouts. Returns `None` for anything unrecognized.
#[must_use]
pub fn unified_timestamp(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.timestamp());
    }

    let cleaned = clean_date_str(trimmed);
    if cleaned.is_empty() {
        return None;
    }

    let with_offset = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&cleaned, fmt).ok())
        .map(|dt| dt.timestamp());
    if with_offset.is_some() {
        return with_offset;
    }

    // A trailing `Z` is UTC; the naive layouts below already assume UTC.
    let naive_input = cleaned.strip_suffix('Z').unwrap_or(&cleaned);

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive_input, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(naive_input, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive).timestamp())
}

/// Formats a Unix timestamp as a `YYYYMMDD` UTC date.
#[must_use]
pub fn upload_date(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.format("%Y%m%d").to_string())
}

fn clean_date_str(raw: &str) -> String {
    raw.replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_timestamp_naive_iso_is_utc() {
        assert_eq!(unified_timestamp("2019-01-16T16:36:42"), Some(1_547_656_602));
    }

    #[test]
    fn test_unified_timestamp_with_fraction() {
        assert_eq!(
            unified_timestamp("2020-05-21T16:15:31.431895"),
            Some(1_590_077_731)
        );
    }

    #[test]
    fn test_unified_timestamp_with_offsets() {
        assert_eq!(unified_timestamp("2019-01-16T16:36:42Z"), Some(1_547_656_602));
        assert_eq!(
            unified_timestamp("2019-01-16T11:36:42-05:00"),
            Some(1_547_656_602)
        );
        assert_eq!(
            unified_timestamp("2019-01-16T16:36:42+0000"),
            Some(1_547_656_602)
        );
    }

    #[test]
    fn test_unified_timestamp_space_separated_and_date_only() {
        assert_eq!(unified_timestamp("2019-01-16 16:36:42"), Some(1_547_656_602));
        assert_eq!(unified_timestamp("2019-01-16"), Some(1_547_596_800));
        assert_eq!(unified_timestamp("16.01.2019"), Some(1_547_596_800));
    }

    #[test]
    fn test_unified_timestamp_rfc2822_and_month_names() {
        assert_eq!(
            unified_timestamp("Wed, 16 Jan 2019 16:36:42 +0000"),
            Some(1_547_656_602)
        );
        assert_eq!(unified_timestamp("January 16, 2019"), Some(1_547_596_800));
        assert_eq!(unified_timestamp("16 Jan 2019"), Some(1_547_596_800));
    }

    #[test]
    fn test_unified_timestamp_garbage_is_none() {
        assert_eq!(unified_timestamp(""), None);
        assert_eq!(unified_timestamp("   "), None);
        assert_eq!(unified_timestamp("yesterday-ish"), None);
        assert_eq!(unified_timestamp("2019-13-45T99:00:00"), None);
    }

    #[test]
    fn test_upload_date_formats_utc_day() {
        assert_eq!(upload_date(1_547_656_602).as_deref(), Some("20190116"));
        assert_eq!(upload_date(1_590_077_731).as_deref(), Some("20200521"));
    }
}
