pub mod event;
pub mod window;

pub use event::{BusyInterval, EventDateTime, NewEvent, UpcomingEvent};
pub use window::{InputError, TimeWindow, parse_clock_time, parse_duration_minutes};
