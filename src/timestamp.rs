//! Conversion of source date and date-time strings into epoch seconds.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{MigrateError, Result};
use crate::model::Due;

/// Date-time layouts accepted when the value carries no UTC offset. Such
/// values are read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Planned-at value for a task: `None` when the task has no due date,
/// otherwise the due instant in epoch seconds. A specific due time wins over
/// the plain date.
pub fn due_to_epoch(due: Option<&Due>) -> Result<Option<i64>> {
    let Some(due) = due else {
        return Ok(None);
    };

    let raw = due
        .datetime
        .as_deref()
        .filter(|dt| !dt.trim().is_empty())
        .unwrap_or(&due.date);
    parse_epoch(raw).map(Some)
}

/// Parse an ISO-8601 date or date-time into epoch seconds, rounded to the
/// nearest second. Date-only values resolve to midnight UTC.
pub fn parse_epoch(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(round_seconds(dt.timestamp(), dt.timestamp_subsec_nanos()));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            let utc = naive.and_utc();
            return Ok(round_seconds(utc.timestamp(), utc.timestamp_subsec_nanos()));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp())
        .ok_or_else(|| MigrateError::InvalidTimestamp(raw.to_string()))
}

fn round_seconds(seconds: i64, nanos: u32) -> i64 {
    if nanos >= 500_000_000 {
        seconds + 1
    } else {
        seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn due(date: &str, datetime: Option<&str>) -> Due {
        Due {
            date: date.into(),
            datetime: datetime.map(Into::into),
        }
    }

    #[test]
    fn date_only_is_midnight_utc() {
        let planned = due_to_epoch(Some(&due("2024-03-01", None))).unwrap();
        assert_eq!(planned, Some(1_709_251_200));
    }

    #[test]
    fn datetime_wins_over_date() {
        let planned =
            due_to_epoch(Some(&due("2024-03-01", Some("2024-03-01T15:30:00Z")))).unwrap();
        assert_eq!(planned, Some(1_709_307_000));
    }

    #[test]
    fn blank_datetime_falls_back_to_date() {
        let planned = due_to_epoch(Some(&due("2024-03-01", Some("")))).unwrap();
        assert_eq!(planned, Some(1_709_251_200));
    }

    #[test]
    fn absent_due_has_no_planned_at() {
        assert_eq!(due_to_epoch(None).unwrap(), None);
    }

    #[test]
    fn floating_datetime_is_read_as_utc() {
        assert_eq!(parse_epoch("2024-03-01T15:30:00").unwrap(), 1_709_307_000);
    }

    #[test]
    fn offsets_are_honoured() {
        assert_eq!(parse_epoch("2024-03-01T16:30:00+01:00").unwrap(), 1_709_307_000);
    }

    #[test]
    fn fractional_seconds_round_to_nearest() {
        assert_eq!(parse_epoch("2019-12-11T22:36:50.000000Z").unwrap(), 1_576_103_810);
        assert_eq!(parse_epoch("2019-12-11T22:36:50.499999Z").unwrap(), 1_576_103_810);
        assert_eq!(parse_epoch("2019-12-11T22:36:50.5Z").unwrap(), 1_576_103_811);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_epoch("next tuesday").unwrap_err();
        assert!(matches!(err, MigrateError::InvalidTimestamp(ref v) if v == "next tuesday"));
    }
}
