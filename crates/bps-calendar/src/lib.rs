//! `bps-calendar` — weekly working-hour calendars.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`interval`]  | `Interval`, one `[start, end)` time-of-day span           |
//! | [`calendar`]  | `ResourceCalendar`, seven ordered interval lists          |
//! | [`error`]     | `CalendarError`, `CalendarResult<T>`                      |
//!
//! # Week model (summary)
//!
//! A calendar holds, per weekday (Monday = 0 … Sunday = 6), a time-ordered,
//! non-overlapping list of intervals.  For an instant `t`:
//!
//! ```text
//! day        = weekday(t)
//! time       = t - midnight(t)
//! working    = any interval on `day` with start ≤ time < end
//! available  = earliest instant ≥ t that is working (scans ≤ 8 days)
//! ```
//!
//! The weekly total is cached and recomputed by the only mutator,
//! [`ResourceCalendar::replace_day`].

pub mod calendar;
pub mod error;
pub mod interval;


pub use calendar::ResourceCalendar;
pub use error::{CalendarError, CalendarResult};
pub use interval::Interval;
