use crate::error::{ContribError, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::path::Path;
use std::process::Command;

pub fn week_key(year: i32, week: u32) -> String {
    format!("{}-W{:02}", year, week)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| ContribError::InvalidDate(format!("'{input}' is not YYYY-MM-DD: {e}")))
}

/// Parse an event timestamp to its UTC calendar date.
pub fn parse_timestamp(input: &str) -> Result<NaiveDate> {
    match DateTime::parse_from_rfc3339(input) {
        Ok(dt) => Ok(dt.with_timezone(&Utc).date_naive()),
        Err(source) => {
            // bare dates are accepted as midnight UTC
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| ContribError::Timestamp {
                input: input.to_string(),
                source,
            })
        }
    }
}

/// ISO week number paired with the calendar (not ISO) year of `date`.
pub fn year_week(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.iso_week().week())
}

/// Hand the file to the platform's default opener.
pub fn open_in_browser(path: &Path) -> std::io::Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_in_utc() {
        let d = parse_timestamp("2023-01-02T23:30:00-05:00").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
    }

    #[test]
    fn accepts_bare_dates() {
        let d = parse_timestamp("2023-01-02").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(matches!(
            parse_timestamp("last tuesday"),
            Err(ContribError::Timestamp { .. })
        ));
    }

    #[test]
    fn rejects_bad_cli_date() {
        assert!(matches!(parse_date("2023/01/02"), Err(ContribError::InvalidDate(_))));
        assert!(parse_date(" 2023-01-02 ").is_ok());
    }

    #[test]
    fn year_week_uses_calendar_year() {
        // Dec 31 2024 is ISO week 1 of 2025
        let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(year_week(d), (2024, 1));
        assert_eq!(week_key(2024, 1), "2024-W01");
    }
}
