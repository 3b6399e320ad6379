use crate::error::{DigestError, Result};
use crate::model::AnalysisWindow;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Parses `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    Err(DigestError::InvalidDate(format!(
        "'{input}' is neither YYYY-MM-DD nor RFC 3339"
    )))
}

/// Builds the analysis window from optional explicit bounds.
///
/// Both bounds: used as given. Start only: runs until `now`. End only: the
/// `days` days before it. Neither: the last `days` days.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    days: u32,
    now: DateTime<Utc>,
) -> Result<AnalysisWindow> {
    let start = start.map(parse_date).transpose()?;
    let end = end.map(parse_date).transpose()?;

    match (start, end) {
        (Some(s), Some(e)) => AnalysisWindow::new(s, e),
        (Some(s), None) => AnalysisWindow::new(s, now),
        (None, Some(e)) => AnalysisWindow::last_days(e, days),
        (None, None) => AnalysisWindow::last_days(now, days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 15, 30, 0).unwrap()
    }

    #[test]
    fn parses_plain_date_as_midnight() {
        assert_eq!(
            parse_date("2024-01-31").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        assert_eq!(
            parse_date("2024-01-31T10:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_date("last tuesday"), Err(DigestError::InvalidDate(_))));
    }

    #[test]
    fn default_is_last_n_days() {
        let w = resolve_window(None, None, 7, now()).unwrap();
        assert_eq!(w.end, now());
        assert_eq!(w.duration_days(), 7);
    }

    #[test]
    fn explicit_bounds() {
        let w = resolve_window(Some("2024-01-01"), Some("2024-01-31"), 7, now()).unwrap();
        assert_eq!(w.duration_days(), 30);
    }

    #[test]
    fn start_only_runs_until_now() {
        let w = resolve_window(Some("2024-03-01"), None, 7, now()).unwrap();
        assert_eq!(w.end, now());
        assert_eq!(w.duration_days(), 19);
    }

    #[test]
    fn end_only_looks_back_days() {
        let w = resolve_window(None, Some("2024-03-10"), 3, now()).unwrap();
        assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap());
    }

    #[test]
    fn same_day_window_is_allowed() {
        let w = resolve_window(Some("2024-03-10"), Some("2024-03-10"), 7, now()).unwrap();
        assert_eq!(w.duration_days(), 0);
    }

    #[test]
    fn huge_day_count_is_an_error() {
        let err = resolve_window(None, None, u32::MAX, now()).unwrap_err();
        assert!(matches!(err, DigestError::InvalidDate(_)));
        let err = resolve_window(None, Some("2024-03-10"), 4_000_000_000, now()).unwrap_err();
        assert!(matches!(err, DigestError::InvalidDate(_)));
    }

    #[test]
    fn reversed_bounds_fail() {
        assert!(resolve_window(Some("2024-03-10"), Some("2024-03-01"), 7, now()).is_err());
    }
}
