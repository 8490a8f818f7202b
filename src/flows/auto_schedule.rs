use super::{FlowError, insert_and_report};
use crate::calendar::{BusyInterval, NewEvent, TimeWindow, parse_clock_time, parse_duration_minutes};
use crate::console::Console;
use crate::google::api::{CalendarApi, CreatedEventInfo};
use crate::storage::config::Config;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq)]
pub enum AutoScheduleOutcome {
    Booked(CreatedEventInfo),
    Conflict(Vec<BusyInterval>),
}

/// Books a quick reservation if the requested window is free.
///
/// Only the exact window `[start, start + duration]` is checked. When
/// anything is busy in it the conflict is reported and nothing is booked;
/// no other slot is tried.
pub async fn create_event_automatically<A, C>(
    api: &A,
    console: &mut C,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<AutoScheduleOutcome, FlowError>
where
    A: CalendarApi + ?Sized,
    C: Console,
{
    let time = parse_clock_time(&console.prompt("Enter hour (hh:mm): ")?)?;
    let minutes = parse_duration_minutes(
        &console.prompt("Enter duration in minutes (remember it is for fast meetings ~15 min): ")?,
    )?;
    let window = TimeWindow::today_at(config.time_zone, now, time, minutes)?;

    let busy = api
        .query_free_busy(&config.calendars.default, &window)
        .await
        .map_err(FlowError::FreeBusyFailed)?;

    if !busy.is_empty() {
        tracing::warn!("{} busy intervals between {} and {}", busy.len(), window.start, window.end);
        for interval in &busy {
            console.say(&format!(
                "There are events between {} - {}",
                format_busy_time(interval.start, config.time_zone),
                format_busy_time(interval.end, config.time_zone)
            ));
        }
        return Ok(AutoScheduleOutcome::Conflict(busy));
    }

    console.say("The room is free... Making reservation");
    let event = NewEvent::new(
        config.events.quick_summary.clone(),
        None,
        &window,
        config.time_zone_name(),
    );

    let created = insert_and_report(api, console, config, &event, now).await?;
    Ok(AutoScheduleOutcome::Booked(created))
}

fn format_busy_time<T: chrono::TimeZone>(time: DateTime<T>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%a %b %d %Y %H:%M").to_string()
}
