use bps_core::Weekday;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid interval {start}-{end}: start must precede end")]
    InvalidInterval { start: String, end: String },

    #[error("overlapping intervals on {day}: {first} and {second}")]
    Overlap {
        day:    Weekday,
        first:  String,
        second: String,
    },

    #[error(transparent)]
    Core(#[from] bps_core::CoreError),
}

impl CalendarError {
    /// `true` for every variant produced by a malformed interval edit.
    pub fn is_invalid_interval(&self) -> bool {
        matches!(
            self,
            CalendarError::InvalidInterval { .. } | CalendarError::Overlap { .. } | CalendarError::Core(_)
        )
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
