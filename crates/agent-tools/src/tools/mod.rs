//! Built-in tool implementations.

mod current_time;
mod reminder;

pub use current_time::CurrentTime;
pub use reminder::ScheduleReminder;
