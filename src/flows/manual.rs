use super::{FlowError, insert_and_report};
use crate::calendar::{NewEvent, TimeWindow, parse_clock_time, parse_duration_minutes};
use crate::console::Console;
use crate::google::api::{CalendarApi, CreatedEventInfo};
use crate::storage::config::Config;
use chrono::{DateTime, Utc};

/// Prompts for summary, start time and duration, then books the event
/// today in the configured time zone. End-after-start is not checked.
pub async fn create_event_manually<A, C>(
    api: &A,
    console: &mut C,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<CreatedEventInfo, FlowError>
where
    A: CalendarApi + ?Sized,
    C: Console,
{
    let summary = console.prompt("Enter summary ")?;
    let time = parse_clock_time(&console.prompt("Enter hour (hh:mm): ")?)?;
    let minutes = parse_duration_minutes(&console.prompt("Enter duration in minutes: ")?)?;

    let window = TimeWindow::today_at(config.time_zone, now, time, minutes)?;
    let event = NewEvent::new(
        summary,
        Some(config.events.location.clone()),
        &window,
        config.time_zone_name(),
    );

    insert_and_report(api, console, config, &event, now).await
}
