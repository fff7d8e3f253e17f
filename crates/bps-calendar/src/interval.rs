//! `Interval` — one working span within a day.

use std::fmt;

use bps_core::DayTime;

use crate::{CalendarError, CalendarResult};

/// A half-open `[start, end)` span of a day.  `end` may be `24:00:00`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub start: DayTime,
    pub end:   DayTime,
}

impl Interval {
    /// Construct an interval, rejecting empty or inverted spans.
    pub fn new(start: DayTime, end: DayTime) -> CalendarResult<Self> {
        if start >= end {
            return Err(CalendarError::InvalidInterval {
                start: start.to_string(),
                end:   end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse `"HH:MM[:SS]"` bounds, e.g. `Interval::parse("09:00", "17:00")`.
    pub fn parse(start: &str, end: &str) -> CalendarResult<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// Length in seconds.
    #[inline]
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.end.secs() - self.start.secs())
    }

    /// `true` if `time` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, time: DayTime) -> bool {
        self.start <= time && time < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
