use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Expected a time as hh:mm, got '{0}'")]
    InvalidTime(String),
    #[error("Expected a duration in minutes, got '{0}'")]
    InvalidDuration(String),
    #[error("{0} does not exist in the configured time zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Parses a wall-clock `hh:mm` entry.
pub fn parse_clock_time(input: &str) -> Result<NaiveTime, InputError> {
    let invalid = || InputError::InvalidTime(input.to_string());

    let (hours, minutes) = input.trim().split_once(':').ok_or_else(invalid)?;
    let hours = parse_clock_field(hours).ok_or_else(invalid)?;
    let minutes = parse_clock_field(minutes).ok_or_else(invalid)?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

// One or two ASCII digits; `u32::from_str` alone would also take a sign.
fn parse_clock_field(field: &str) -> Option<u32> {
    if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parses a duration in whole minutes. Zero and negative values pass
/// through; callers decide what an empty or inverted window means.
pub fn parse_duration_minutes(input: &str) -> Result<i64, InputError> {
    input
        .trim()
        .parse()
        .map_err(|_| InputError::InvalidDuration(input.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// Window starting at `time` on today's date in `tz` and lasting `minutes`.
    pub fn today_at(
        tz: Tz,
        now: DateTime<Utc>,
        time: NaiveTime,
        minutes: i64,
    ) -> Result<Self, InputError> {
        let local = now.with_timezone(&tz).date_naive().and_time(time);
        let start = tz
            .from_local_datetime(&local)
            .earliest()
            .ok_or(InputError::NonexistentLocalTime(local))?
            .fixed_offset();

        let end = TimeDelta::try_minutes(minutes)
            .and_then(|delta| start.checked_add_signed(delta))
            .ok_or_else(|| InputError::InvalidDuration(minutes.to_string()))?;

        Ok(Self { start, end })
    }
}
