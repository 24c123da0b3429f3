//! State management for the reference picker.
//!
//! Plain data structures with no I/O; the services layer drives them.

pub mod countdown;
pub mod navigation;
pub mod transform_state;

pub use countdown::{
    format_hms, parse_schedule, Countdown, CountdownPlan, ScheduleToken, TickOutcome, TimerState,
};
pub use navigation::{ImageEntry, NavigationState};
pub use transform_state::TransformState;
