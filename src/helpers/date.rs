//! Date helper functions (Vietnamese display formats)

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Short date: "18 thg 2, 2026"
pub fn format_date_short<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    format!("{} thg {}, {}", date.day(), date.month(), date.year())
}

/// Long date: "18 tháng 2, 2026"
pub fn format_date_long<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    format!("{} tháng {}, {}", date.day(), date.month(), date.year())
}

/// Long date with time: "18 tháng 2, 2026 20:00"
pub fn format_datetime_long<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    format!(
        "{} {:02}:{:02}",
        format_date_long(date),
        date.hour(),
        date.minute()
    )
}

/// Timestamp in the vi-VN locale style: "14:05:09 19/10/2026"
pub fn format_timestamp<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%H:%M:%S %d/%m/%Y").to_string()
}

/// Display form of an authored post date.
///
/// Dates that do not parse are shown as authored.
pub fn format_post_date(date: &str) -> String {
    match parse_date(date) {
        Some(d) => format!("{} tháng {}, {}", d.day(), d.month(), d.year()),
        None => date.to_string(),
    }
}

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse the date part of a date string in various formats
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| parse_naive_date(s))
}

/// Parse a date string into the instant it names.
///
/// Offsets are honoured; dates and times without one are read as UTC, a
/// bare date as its midnight.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_naive_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
        .map(|dt| dt.and_utc())
}

fn parse_naive_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn sample() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-02-18T20:00:00+07:00").unwrap()
    }

    #[test]
    fn test_short_and_long() {
        assert_eq!(format_date_short(&sample()), "18 thg 2, 2026");
        assert_eq!(format_date_long(&sample()), "18 tháng 2, 2026");
        assert_eq!(format_datetime_long(&sample()), "18 tháng 2, 2026 20:00");
    }

    #[test]
    fn test_timestamp() {
        let date = DateTime::parse_from_rfc3339("2026-10-19T04:05:09+07:00").unwrap();
        assert_eq!(format_timestamp(&date), "04:05:09 19/10/2026");
    }

    #[test]
    fn test_format_post_date() {
        assert_eq!(format_post_date("2025-01-01"), "1 tháng 1, 2025");
        assert_eq!(format_post_date("2025/03/09 10:00:00"), "9 tháng 3, 2025");
        assert_eq!(format_post_date("2025-03-09T10:00:00+07:00"), "9 tháng 3, 2025");
        assert_eq!(format_post_date("soon"), "soon");
        assert_eq!(format_post_date(""), "");
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = |s: &str| parse_timestamp(s).map(|d| d.to_rfc3339());
        assert_eq!(ts("2025-03-01T08:00:00+07:00").as_deref(), Some("2025-03-01T01:00:00+00:00"));
        assert_eq!(ts("2025-1-5").as_deref(), Some("2025-01-05T00:00:00+00:00"));
        assert_eq!(ts("2025/03/09 10:00:00").as_deref(), Some("2025-03-09T10:00:00+00:00"));
        assert_eq!(ts(" 2025-01-10 ").as_deref(), Some("2025-01-10T00:00:00+00:00"));
        assert_eq!(ts("soon"), None);
        assert_eq!(ts(""), None);
    }
}
