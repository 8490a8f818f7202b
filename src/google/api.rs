use crate::calendar::{BusyInterval, NewEvent, TimeWindow, UpcomingEvent};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Calendar not found: {0}")]
    NotFound(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: Option<String>,
    summary: Option<String>,
    start: Option<GoogleDateTime>,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    items: Option<Vec<GoogleEvent>>,
}

#[derive(Debug, Serialize)]
struct FreeBusyRequest<'a> {
    #[serde(rename = "timeMin")]
    time_min: String,
    #[serde(rename = "timeMax")]
    time_max: String,
    items: Vec<FreeBusyItem<'a>>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<GoogleBusyPeriod>,
    #[serde(default)]
    errors: Vec<FreeBusyCalendarError>,
}

#[derive(Debug, Deserialize)]
struct GoogleBusyPeriod {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendarError {
    domain: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedEventInfo {
    pub id: String,
    pub html_link: Option<String>,
}

/// The three provider calls the quickstart needs. Every call is a single
/// round trip; there is no caching or retry behind it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<UpcomingEvent>, ApiError>;

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<CreatedEventInfo, ApiError>;

    async fn query_free_busy(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<BusyInterval>, ApiError>;
}

pub struct GoogleCalendarClient {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl GoogleCalendarClient {
    pub fn new(access_token: String) -> Self {
        Self {
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            access_token,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    async fn check_status(
        response: reqwest::Response,
        operation: &str,
        calendar_id: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        tracing::info!("{} response status: {}", operation, status);

        if status == 401 {
            tracing::error!("Authentication failed during {}", operation);
            return Err(ApiError::AuthenticationFailed);
        }

        if status == 404 {
            tracing::error!("Calendar not found: {}", calendar_id);
            return Err(ApiError::NotFound(calendar_id.to_string()));
        }

        if status == 429 {
            tracing::warn!("Rate limit exceeded");
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("{} failed. Status: {}, Body: {}", operation, status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        Ok(response)
    }

    fn convert_upcoming(ge: GoogleEvent) -> UpcomingEvent {
        let start = ge
            .start
            .and_then(|s| s.date_time.or(s.date))
            .unwrap_or_default();

        UpcomingEvent {
            summary: ge.summary.unwrap_or_default(),
            start,
        }
    }

    fn convert_busy(period: GoogleBusyPeriod) -> Result<BusyInterval, ApiError> {
        let start = DateTime::parse_from_rfc3339(&period.start)
            .map_err(|e| ApiError::ParseError(format!("Invalid busy start: {}", e)))?;
        let end = DateTime::parse_from_rfc3339(&period.end)
            .map_err(|e| ApiError::ParseError(format!("Invalid busy end: {}", e)))?;

        Ok(BusyInterval { start, end })
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<UpcomingEvent>, ApiError> {
        let url = self.events_url(calendar_id);
        let time_min = time_min.to_rfc3339_opts(SecondsFormat::Secs, true);
        let max_results = max_results.to_string();

        tracing::info!("Listing {} upcoming events from {}", max_results, time_min);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("maxResults", max_results.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;

        let response = Self::check_status(response, "List events", calendar_id).await?;

        let event_list: EventListResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))?;

        let events: Vec<UpcomingEvent> = event_list
            .items
            .unwrap_or_default()
            .into_iter()
            .map(Self::convert_upcoming)
            .collect();

        tracing::info!("Listed {} events", events.len());
        Ok(events)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<CreatedEventInfo, ApiError> {
        let url = self.events_url(calendar_id);

        tracing::info!("Creating event: {} at {}", event.summary, event.start.date_time);
        tracing::debug!("POST {} with payload: {:?}", url, event);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;

        let response = Self::check_status(response, "Insert event", calendar_id).await?;

        let created: GoogleEvent = response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))?;
        let id = created.id.unwrap_or_default();
        tracing::info!("Event created successfully with ID: {}", id);

        Ok(CreatedEventInfo {
            id,
            html_link: created.html_link,
        })
    }

    async fn query_free_busy(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<BusyInterval>, ApiError> {
        let url = format!("{}/freeBusy", self.base_url);
        let request = FreeBusyRequest {
            time_min: window.start.to_rfc3339(),
            time_max: window.end.to_rfc3339(),
            items: vec![FreeBusyItem { id: calendar_id }],
        };

        tracing::info!("Querying free/busy for {} between {} and {}", calendar_id, request.time_min, request.time_max);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let response = Self::check_status(response, "Free/busy query", calendar_id).await?;

        let mut free_busy: FreeBusyResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))?;

        let calendar = free_busy
            .calendars
            .remove(calendar_id)
            .ok_or_else(|| ApiError::NotFound(calendar_id.to_string()))?;

        if !calendar.errors.is_empty() {
            let reasons: Vec<String> = calendar
                .errors
                .iter()
                .map(|e| {
                    format!(
                        "{}/{}",
                        e.domain.as_deref().unwrap_or("unknown"),
                        e.reason.as_deref().unwrap_or("unknown")
                    )
                })
                .collect();
            tracing::error!("Free/busy query returned errors for {}: {:?}", calendar_id, reasons);
            return Err(ApiError::RequestError(reasons.join(", ")));
        }

        let busy = calendar
            .busy
            .into_iter()
            .map(Self::convert_busy)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("{} busy intervals in requested window", busy.len());
        Ok(busy)
    }
}
