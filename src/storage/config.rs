use chrono_tz::Tz;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "calendar-quickstart";
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub scopes: Vec<String>,
    pub client_secret_path: PathBuf,
    pub token_path: PathBuf,
    pub time_zone: Tz,
    pub calendars: CalendarsConfig,
    pub events: EventDefaults,
    pub endpoints: GoogleEndpoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarsConfig {
    pub default: String,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDefaults {
    pub location: String,
    pub quick_summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoogleEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

impl Config {
    /// Token file location under `home`: `<home>/.credentials/<app>-token.json`.
    pub fn token_path_in(home: &Path, app_name: &str) -> PathBuf {
        home.join(".credentials").join(format!("{}-token.json", app_name))
    }

    pub fn log_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
    }

    pub fn with_token_path(mut self, token_path: PathBuf) -> Self {
        self.token_path = token_path;
        self
    }

    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn time_zone_name(&self) -> &'static str {
        self.time_zone.name()
    }
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            api_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
        }
    }
}

impl GoogleEndpoints {
    /// All three endpoints rooted at one base, e.g. a local mock server.
    pub fn rooted_at(base: &str) -> Self {
        Self {
            auth_url: format!("{}/o/oauth2/v2/auth", base),
            token_url: format!("{}/token", base),
            api_base_url: base.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            scopes: vec![CALENDAR_SCOPE.to_string()],
            client_secret_path: PathBuf::from("client_secret.json"),
            token_path: Self::token_path_in(&home, APP_NAME),
            time_zone: chrono_tz::America::Argentina::Buenos_Aires,
            calendars: CalendarsConfig {
                default: "primary".to_string(),
                max_results: 10,
            },
            events: EventDefaults {
                location: "Buenos, Aires".to_string(),
                quick_summary: "Fast reservation".to_string(),
            },
            endpoints: GoogleEndpoints::default(),
        }
    }
}
