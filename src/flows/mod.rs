pub mod auto_schedule;
pub mod listing;
pub mod manual;

use crate::calendar::{InputError, NewEvent};
use crate::console::Console;
use crate::google::api::{ApiError, CalendarApi, CreatedEventInfo};
use crate::storage::config::Config;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use auto_schedule::{AutoScheduleOutcome, create_event_automatically};
pub use listing::list_upcoming_events;
pub use manual::create_event_manually;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("The API returned an error: {0}")]
    ListFailed(#[source] ApiError),
    #[error("There was an error contacting the Calendar service: {0}")]
    InsertFailed(#[source] ApiError),
    #[error("There was an error while retrieving information from calendar: {0}")]
    FreeBusyFailed(#[source] ApiError),
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("Terminal error: {0}")]
    TerminalError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListEvents,
    CreateManually,
    CreateAutomatically,
}

impl MenuChoice {
    /// Anything other than "1" or "2" falls through to auto-create.
    pub fn from_input(input: &str) -> Self {
        match input {
            "1" => MenuChoice::ListEvents,
            "2" => MenuChoice::CreateManually,
            _ => MenuChoice::CreateAutomatically,
        }
    }
}

pub fn show_menu<C: Console>(console: &mut C) {
    console.say("**********************************");
    console.say("1- View your current events list");
    console.say("2- Create an event manually");
    console.say("3- Create an event automatically");
    console.say("**********************************");
}

/// Inserts `event`, reports its link and lists the calendar again.
pub(crate) async fn insert_and_report<A, C>(
    api: &A,
    console: &mut C,
    config: &Config,
    event: &NewEvent,
    now: DateTime<Utc>,
) -> Result<CreatedEventInfo, FlowError>
where
    A: CalendarApi + ?Sized,
    C: Console,
{
    let created = api
        .insert_event(&config.calendars.default, event)
        .await
        .map_err(FlowError::InsertFailed)?;

    console.say(&format!(
        "Event created: {}",
        created.html_link.as_deref().unwrap_or_default()
    ));

    list_upcoming_events(api, console, config, now).await?;
    Ok(created)
}

/// One menu read, one dispatched flow. Errors are reported on the console
/// and returned so the caller can record them.
pub struct Interaction<A, C> {
    api: A,
    console: C,
    config: Config,
}

impl<A: CalendarApi, C: Console> Interaction<A, C> {
    pub fn new(api: A, console: C, config: Config) -> Self {
        Self { api, console, config }
    }

    pub async fn run(&mut self) -> Result<MenuChoice, FlowError> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&mut self, now: DateTime<Utc>) -> Result<MenuChoice, FlowError> {
        let result = self.dispatch(now).await;

        if let Err(e) = &result {
            tracing::error!("Flow aborted: {}", e);
            self.console.say(&e.to_string());
        }

        result
    }

    async fn dispatch(&mut self, now: DateTime<Utc>) -> Result<MenuChoice, FlowError> {
        show_menu(&mut self.console);
        let option = self.console.prompt("Enter the option: ")?;
        let choice = MenuChoice::from_input(&option);
        tracing::info!("Menu option {:?} selected as {:?}", option, choice);

        match choice {
            MenuChoice::ListEvents => {
                list_upcoming_events(&self.api, &mut self.console, &self.config, now).await?;
            }
            MenuChoice::CreateManually => {
                create_event_manually(&self.api, &mut self.console, &self.config, now).await?;
            }
            MenuChoice::CreateAutomatically => {
                create_event_automatically(&self.api, &mut self.console, &self.config, now).await?;
            }
        }

        Ok(choice)
    }

    pub fn console(&self) -> &C {
        &self.console
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::UpcomingEvent;
    use crate::console::testing::ScriptedConsole;
    use crate::google::api::MockCalendarApi;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn menu_choice_one_lists_events() {
        assert_eq!(MenuChoice::from_input("1"), MenuChoice::ListEvents);
    }

    #[test]
    fn menu_choice_two_creates_manually() {
        assert_eq!(MenuChoice::from_input("2"), MenuChoice::CreateManually);
    }

    #[test]
    fn menu_choice_three_creates_automatically() {
        assert_eq!(MenuChoice::from_input("3"), MenuChoice::CreateAutomatically);
    }

    #[test]
    fn unknown_menu_input_falls_through_to_auto_create() {
        assert_eq!(MenuChoice::from_input("banana"), MenuChoice::CreateAutomatically);
        assert_eq!(MenuChoice::from_input(""), MenuChoice::CreateAutomatically);
        assert_eq!(MenuChoice::from_input(" 1"), MenuChoice::CreateAutomatically);
    }

    #[tokio::test]
    async fn option_one_issues_single_primary_listing() {
        let mut api = MockCalendarApi::new();
        api.expect_list_upcoming()
            .withf(|calendar_id, time_min, max_results| {
                calendar_id == "primary" && *time_min == now() && *max_results == 10
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![UpcomingEvent {
                    summary: "Standup".to_string(),
                    start: "2026-10-15T09:30:00-03:00".to_string(),
                }])
            });
        api.expect_insert_event().never();
        api.expect_query_free_busy().never();

        let mut interaction = Interaction::new(api, ScriptedConsole::new(&["1"]), Config::default());
        let choice = interaction.run_at(now()).await.unwrap();

        assert_eq!(choice, MenuChoice::ListEvents);
        let console = interaction.console();
        assert!(console.printed("1- View your current events list"));
        assert!(console.printed("2026-10-15T09:30:00-03:00 - Standup"));
        assert_eq!(console.prompts, vec!["Enter the option: "]);
    }

    #[tokio::test]
    async fn other_input_dispatches_to_auto_create() {
        let mut api = MockCalendarApi::new();
        api.expect_query_free_busy().times(1).returning(|_, _| Ok(vec![]));
        api.expect_insert_event()
            .withf(|_, event| event.summary == "Fast reservation")
            .times(1)
            .returning(|_, _| {
                Ok(CreatedEventInfo {
                    id: "evt".to_string(),
                    html_link: Some("https://calendar/evt".to_string()),
                })
            });
        api.expect_list_upcoming().times(1).returning(|_, _, _| Ok(vec![]));

        let console = ScriptedConsole::new(&["x", "10:00", "15"]);
        let mut interaction = Interaction::new(api, console, Config::default());
        let choice = interaction.run_at(now()).await.unwrap();

        assert_eq!(choice, MenuChoice::CreateAutomatically);
    }

    #[tokio::test]
    async fn flow_errors_are_reported_on_console() {
        let mut api = MockCalendarApi::new();
        api.expect_list_upcoming()
            .times(1)
            .returning(|_, _, _| Err(ApiError::AuthenticationFailed));

        let mut interaction = Interaction::new(api, ScriptedConsole::new(&["1"]), Config::default());
        let result = interaction.run_at(now()).await;

        assert!(matches!(result, Err(FlowError::ListFailed(ApiError::AuthenticationFailed))));
        assert!(interaction.console().printed("The API returned an error: Authentication failed"));
    }

    #[tokio::test]
    async fn closed_terminal_aborts_before_any_call() {
        let mut api = MockCalendarApi::new();
        api.expect_list_upcoming().never();
        api.expect_insert_event().never();
        api.expect_query_free_busy().never();

        let mut interaction = Interaction::new(api, ScriptedConsole::new(&[]), Config::default());
        let result = interaction.run_at(now()).await;

        assert!(matches!(result, Err(FlowError::TerminalError(_))));
    }
}
