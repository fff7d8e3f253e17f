//! Simulation time model.
//!
//! # Design
//!
//! Simulated instants are absolute UTC timestamps ([`Timestamp`]); the
//! scheduler never consults the wall clock.  Work calendars are expressed in
//! weekday + time-of-day terms, so the other half of the model is
//! [`DayTime`], a second-resolution offset from midnight:
//!
//!   instant = midnight(date) + day_time
//!
//! `DayTime` is an integer, so interval arithmetic inside a calendar is
//! exact (no floating-point drift) and comparisons are O(1).  The value
//! `24:00:00` is allowed as an interval *end* to express "until midnight".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::{CoreError, CoreResult};

pub use chrono::Weekday;

/// An absolute simulated instant.
pub type Timestamp = DateTime<Utc>;

/// Monday-first weekday order used for calendar indexing.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Calendar slot of `day` (Monday = 0 … Sunday = 6).
#[inline]
pub fn weekday_index(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

/// Convert a (possibly fractional) number of seconds into a `chrono`
/// duration at millisecond resolution.  Negative and NaN inputs map to zero.
pub fn duration_from_secs(secs: f64) -> chrono::Duration {
    if secs.is_nan() || secs <= 0.0 {
        return chrono::Duration::zero();
    }
    chrono::Duration::milliseconds((secs * 1_000.0).round() as i64)
}

// ── DayTime ───────────────────────────────────────────────────────────────────

/// Seconds since midnight, `0..=86_400`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct DayTime(u32);

impl DayTime {
    pub const MIDNIGHT: DayTime = DayTime(0);
    /// `24:00:00`, only meaningful as the end of an interval.
    pub const END_OF_DAY: DayTime = DayTime(86_400);

    /// Build from hours / minutes / seconds.
    pub fn hms(hours: u32, minutes: u32, seconds: u32) -> CoreResult<Self> {
        let bad = || CoreError::InvalidDayTime(format!("{hours:02}:{minutes:02}:{seconds:02}"));
        if hours > 24 || minutes >= 60 || seconds >= 60 {
            return Err(bad());
        }
        let total = hours * 3_600 + minutes * 60 + seconds;
        if total > Self::END_OF_DAY.0 {
            return Err(bad());
        }
        Ok(DayTime(total))
    }

    /// Build from whole seconds since midnight.
    pub fn from_secs(secs: u32) -> CoreResult<Self> {
        if secs > Self::END_OF_DAY.0 {
            return Err(CoreError::InvalidDayTime(secs.to_string()));
        }
        Ok(DayTime(secs))
    }

    /// Time of day of a timestamp.
    pub fn of(ts: &Timestamp) -> Self {
        use chrono::Timelike;
        DayTime(ts.num_seconds_from_midnight())
    }

    #[inline]
    pub fn secs(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        write!(f, "{:02}:{:02}:{:02}", s / 3_600, (s % 3_600) / 60, s % 60)
    }
}

impl FromStr for DayTime {
    type Err = CoreError;

    /// Accepts `HH:MM` and `HH:MM:SS`.
    fn from_str(s: &str) -> CoreResult<Self> {
        let bad = || CoreError::InvalidDayTime(s.to_owned());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(bad());
        }
        let mut fields = [0u32; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| bad())?;
        }
        DayTime::hms(fields[0], fields[1], fields[2]).map_err(|_| bad())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DayTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DayTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
