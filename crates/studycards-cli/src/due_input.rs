//! Due-date parsing for `--due`.
//!
//! Accepted forms, interpreted in the time zone of the reference instant:
//! - RFC 3339 (`2024-06-01T18:00:00Z`, `2024-06-01T18:00:00-03:00`)
//! - `YYYY-MM-DD HH:MM` local wall-clock time
//! - `YYYY-MM-DD`, meaning 23:59 local time that day
//! - relative offsets: `+3d`, `+4h`, `+2w`, `+30m`

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not read due date '{input}'")]
pub struct DueDateError {
    pub input: String,
}

/// Parse `input` relative to `now`.
///
/// # Errors
///
/// Returns [`DueDateError`] when no accepted form matches, or the local time
/// does not exist (e.g. skipped by a DST change).
pub fn parse_due<Tz: TimeZone>(input: &str, now: &DateTime<Tz>) -> Result<DateTime<Utc>, DueDateError> {
    let trimmed = input.trim();
    let error = || DueDateError {
        input: input.to_string(),
    };

    if let Some(offset) = trimmed.strip_prefix('+') {
        return parse_offset(offset)
            .map(|delta| (now.clone() + delta).with_timezone(&Utc))
            .ok_or_else(error);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| NaiveTime::from_hms_opt(23, 59, 0).map(|t| date.and_time(t)))
        })
        .ok_or_else(error)?;

    now.timezone()
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(error)
}

fn parse_offset(raw: &str) -> Option<Duration> {
    let unit = raw.chars().last()?;
    let amount: i64 = raw[..raw.len() - unit.len_utf8()].parse().ok()?;
    match unit {
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => None,
    }
}
