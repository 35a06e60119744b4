use chrono::{Days, NaiveDate, NaiveDateTime};
use rusqlite::types::Type;

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a stored date column, reporting a conversion failure for `column`
pub fn parse_date(value: &str, column: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Parse a stored timestamp column. SQLite's `datetime('now')` writes a space
/// instead of `T`, so both separators are accepted.
pub fn parse_datetime(value: &str, column: usize) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// First date inside a trailing window of `days` ending at `today`.
///
/// Windows reaching past the representable calendar saturate to the earliest
/// date, which is how "all time" sentinels such as 9999 days behave.
pub fn window_start(today: NaiveDate, days: i64) -> Result<NaiveDate> {
    let days = u64::try_from(days)
        .map_err(|_| Error::Validation(format!("days must not be negative, got {}", days)))?;

    Ok(today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN))
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn test_window_start_thirty_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let start = window_start(today, 30).unwrap();

        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_window_start_zero_days_is_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(window_start(today, 0).unwrap(), today);
    }

    #[test]
    fn test_window_start_saturates() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let start = window_start(today, i64::MAX).unwrap();

        assert_eq!(start, NaiveDate::MIN);
    }

    #[test]
    fn test_window_start_rejects_negative() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert!(window_start(today, -1).unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_datetime_accepts_sqlite_format() {
        let dt = parse_datetime("2024-01-15 10:30:45", 0).unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.second(), 45);

        let dt = parse_datetime("2024-01-15T10:30:45", 0).unwrap();
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_date_reports_column() {
        let err = parse_date("15/01/2024", 4).unwrap_err();
        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, _)
        ));
    }
}
