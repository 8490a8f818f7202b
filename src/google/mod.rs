pub mod api;
pub mod auth;

pub use api::{ApiError, CalendarApi, CreatedEventInfo, GoogleCalendarClient};
pub use auth::{AuthError, Credential, GoogleAuthenticator};
