//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where they surface time-of-day parse failures.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid time of day {0:?}: expected HH:MM or HH:MM:SS within 00:00:00..=24:00:00")]
    InvalidDayTime(String),
}

/// Shorthand result type for `bps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
