use super::FlowError;
use crate::calendar::UpcomingEvent;
use crate::console::Console;
use crate::google::api::CalendarApi;
use crate::storage::config::Config;
use chrono::{DateTime, Utc};

/// Lists the next events on the configured calendar starting at `now`.
pub async fn list_upcoming_events<A, C>(
    api: &A,
    console: &mut C,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Vec<UpcomingEvent>, FlowError>
where
    A: CalendarApi + ?Sized,
    C: Console,
{
    let events = api
        .list_upcoming(&config.calendars.default, now, config.calendars.max_results)
        .await
        .map_err(FlowError::ListFailed)?;

    if events.is_empty() {
        console.say("No upcoming events found.");
    } else {
        console.say(&format!("Upcoming {} events:", config.calendars.max_results));
        for event in &events {
            console.say(&format_listing_line(event));
        }
    }

    Ok(events)
}

fn format_listing_line(event: &UpcomingEvent) -> String {
    format!("{} - {}", event.start, event.summary)
}
