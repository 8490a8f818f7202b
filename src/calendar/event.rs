use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::window::TimeWindow;

/// Event payload sent to `events.insert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl NewEvent {
    pub fn new(summary: String, location: Option<String>, window: &TimeWindow, time_zone: &str) -> Self {
        Self {
            summary,
            location,
            start: EventDateTime {
                date_time: window.start.to_rfc3339(),
                time_zone: time_zone.to_string(),
            },
            end: EventDateTime {
                date_time: window.end.to_rfc3339(),
                time_zone: time_zone.to_string(),
            },
        }
    }
}

/// One row of the upcoming-events listing. `start` is the event's
/// `dateTime`, or its `date` for all-day events.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingEvent {
    pub summary: String,
    pub start: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusyInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn window(hour: u32, minute: u32, minutes: i64) -> TimeWindow {
        let now = DateTime::parse_from_rfc3339("2026-10-15T15:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        TimeWindow::today_at(
            chrono_tz::America::Argentina::Buenos_Aires,
            now,
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
            minutes,
        )
        .unwrap()
    }

    #[test]
    fn new_event_serializes_like_calendar_resource() {
        let event = NewEvent::new(
            "Standup".to_string(),
            Some("Buenos, Aires".to_string()),
            &window(9, 30, 15),
            "America/Argentina/Buenos_Aires",
        );

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "summary": "Standup",
                "location": "Buenos, Aires",
                "start": {
                    "dateTime": "2026-10-15T09:30:00-03:00",
                    "timeZone": "America/Argentina/Buenos_Aires"
                },
                "end": {
                    "dateTime": "2026-10-15T09:45:00-03:00",
                    "timeZone": "America/Argentina/Buenos_Aires"
                }
            })
        );
    }

    #[test]
    fn new_event_without_location_omits_field() {
        let event = NewEvent::new("Fast reservation".to_string(), None, &window(10, 0, 15), "UTC");

        let json = serde_json::to_value(&event).unwrap();

        assert!(json.get("location").is_none());
    }
}
