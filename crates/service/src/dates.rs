//! Date parsing and windowing helpers.
//!
//! All calendar arithmetic is done in UTC; day buckets and month windows are
//! UTC-based rather than server-local.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)));
    }
    Err("expected an ISO 8601 date or datetime".into())
}

/// Half-open window `[start of day, start of next day)` containing `at`.
pub fn day_window(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&at.date_naive().and_time(NaiveTime::MIN));
    (start, start + chrono::Duration::days(1))
}

/// Half-open window `[first of month, first of next month)`, or `None` for
/// an invalid month/year combination.
pub fn month_window(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN)),
        Utc.from_utc_datetime(&end.and_time(NaiveTime::MIN)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let dt = parse_date_time("2024-03-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_date_time("2024-03-01T10:30:00+07:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T03:30:00+00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2024-13-01").is_err());
    }

    #[test]
    fn day_window_covers_exactly_one_day() {
        let at = parse_date_time("2024-03-15T18:45:00Z").unwrap();
        let (start, end) = day_window(at);
        assert_eq!(start.to_rfc3339(), "2024-03-15T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-16T00:00:00+00:00");
    }

    #[test]
    fn month_window_rolls_december_into_next_year() {
        let (start, end) = month_window(2024, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn month_window_rejects_invalid_month() {
        assert!(month_window(2024, 0).is_none());
        assert!(month_window(2024, 13).is_none());
    }
}
