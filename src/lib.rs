pub mod calendar;
pub mod console;
pub mod flows;
pub mod google;
pub mod storage;

pub use calendar::{BusyInterval, NewEvent, TimeWindow, UpcomingEvent};
pub use console::{Console, TerminalConsole};
pub use flows::{Interaction, MenuChoice};
pub use storage::Config;
