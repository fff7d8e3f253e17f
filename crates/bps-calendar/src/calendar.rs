//! `ResourceCalendar` — an agent's weekly working hours.
//!
//! # Availability
//!
//! The executor asks one question of a calendar: "given that the agent could
//! start at `t`, when can it actually start?"  [`ResourceCalendar::next_available`]
//! answers by scanning today's remaining intervals and then up to seven
//! following days.  A calendar with no intervals at all never becomes
//! available and returns `None`; the router treats such agents as
//! ineligible instead of letting the scan run forever.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};

use bps_core::{DayTime, Timestamp, WEEKDAYS, Weekday, weekday_index};

use crate::{CalendarError, CalendarResult, Interval};

/// Seven ordered interval lists plus the cached weekly total.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "CalendarDays", try_from = "CalendarDays")
)]
pub struct ResourceCalendar {
    /// Intervals per weekday, Monday first.  Each list is sorted and
    /// non-overlapping.
    days: [Vec<Interval>; 7],
    /// Sum of all interval lengths, seconds.
    total_weekly_work: u64,
}

/// Wire form: the derived total is recomputed on load, and every day is
/// re-validated so a hand-edited document cannot smuggle in overlaps.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CalendarDays {
    days: [Vec<Interval>; 7],
}

#[cfg(feature = "serde")]
impl From<ResourceCalendar> for CalendarDays {
    fn from(cal: ResourceCalendar) -> Self {
        CalendarDays { days: cal.days }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<CalendarDays> for ResourceCalendar {
    type Error = CalendarError;

    fn try_from(wire: CalendarDays) -> CalendarResult<Self> {
        let mut cal = ResourceCalendar::empty();
        for (day, intervals) in WEEKDAYS.into_iter().zip(wire.days) {
            cal.replace_day(day, intervals)?;
        }
        Ok(cal)
    }
}

impl ResourceCalendar {
    /// A calendar with no working time.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The same `intervals` on every day in `days`; other days are off.
    ///
    /// ```rust
    /// use bps_calendar::{Interval, ResourceCalendar};
    /// use bps_core::{WEEKDAYS, Weekday};
    ///
    /// let office = ResourceCalendar::weekly(
    ///     &WEEKDAYS[..5],
    ///     &[Interval::parse("09:00", "17:00").unwrap()],
    /// ).unwrap();
    /// assert_eq!(office.total_weekly_work(), 5 * 8 * 3_600);
    /// assert!(office.day(Weekday::Sat).is_empty());
    /// ```
    pub fn weekly(days: &[Weekday], intervals: &[Interval]) -> CalendarResult<Self> {
        let mut cal = Self::empty();
        for &day in days {
            cal.replace_day(day, intervals.to_vec())?;
        }
        Ok(cal)
    }

    /// Open around the clock, every day.
    pub fn always() -> Self {
        let all_day = Interval { start: DayTime::MIDNIGHT, end: DayTime::END_OF_DAY };
        let days: [Vec<Interval>; 7] = std::array::from_fn(|_| vec![all_day]);
        let total_weekly_work = 7 * all_day.duration_secs();
        Self { days, total_weekly_work }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Replace the interval list for `day` and recompute the weekly total.
    ///
    /// Intervals may be given in any order; they are stored sorted.  Empty,
    /// inverted, or overlapping intervals are rejected and the calendar is
    /// left unchanged.  Touching intervals (`09-12`, `12-15`) are allowed.
    pub fn replace_day(&mut self, day: Weekday, mut intervals: Vec<Interval>) -> CalendarResult<()> {
        for iv in &intervals {
            if iv.start >= iv.end {
                return Err(CalendarError::InvalidInterval {
                    start: iv.start.to_string(),
                    end:   iv.end.to_string(),
                });
            }
        }
        intervals.sort_unstable();
        if let Some(pair) = intervals.windows(2).find(|w| w[1].start < w[0].end) {
            return Err(CalendarError::Overlap {
                day,
                first:  pair[0].to_string(),
                second: pair[1].to_string(),
            });
        }

        self.days[weekday_index(day)] = intervals;
        self.total_weekly_work = self
            .days
            .iter()
            .flatten()
            .map(Interval::duration_secs)
            .sum();
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Sorted intervals for `day`.
    pub fn day(&self, day: Weekday) -> &[Interval] {
        &self.days[weekday_index(day)]
    }

    /// Seconds of work on `day`.
    pub fn work_on(&self, day: Weekday) -> u64 {
        self.day(day).iter().map(Interval::duration_secs).sum()
    }

    /// Seconds of work across the whole week.
    #[inline]
    pub fn total_weekly_work(&self) -> u64 {
        self.total_weekly_work
    }

    /// `true` if the calendar has no working time at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_weekly_work == 0
    }

    /// `true` if `at` falls inside a working interval.
    pub fn is_working_at(&self, at: &Timestamp) -> bool {
        let time = DayTime::of(at);
        self.day(at.weekday()).iter().any(|iv| iv.contains(time))
    }

    /// Earliest instant `≥ at` inside a working interval.
    ///
    /// Returns `at` itself when the agent is already working.  `None` only
    /// for an empty calendar.
    pub fn next_available(&self, at: &Timestamp) -> Option<Timestamp> {
        if self.is_empty() {
            return None;
        }
        let date = at.date_naive();
        let time = DayTime::of(at);

        for offset in 0..=7i64 {
            let day_date = date + chrono::Duration::days(offset);
            for iv in self.day(day_date.weekday()) {
                if offset == 0 {
                    if iv.end <= time {
                        continue;
                    }
                    if iv.start <= time {
                        return Some(*at);
                    }
                }
                return at_time(day_date, iv.start);
            }
        }
        None
    }

    /// Working seconds of this calendar that fall inside `[start, end)`.
    ///
    /// Read-only utilization query used by reporting collaborators.
    pub fn working_seconds_between(&self, start: &Timestamp, end: &Timestamp) -> u64 {
        if end <= start || self.is_empty() {
            return 0;
        }
        let mut total = 0u64;
        let mut date = start.date_naive();
        let last = end.date_naive();
        while date <= last {
            for iv in self.day(date.weekday()) {
                let (Some(iv_start), Some(iv_end)) = (at_time(date, iv.start), at_time(date, iv.end))
                else {
                    continue;
                };
                let lo = iv_start.max(*start);
                let hi = iv_end.min(*end);
                if hi > lo {
                    total += (hi - lo).num_seconds().max(0) as u64;
                }
            }
            date += chrono::Duration::days(1);
        }
        total
    }

    /// Human-readable multi-line description, e.g.
    ///
    /// ```text
    /// Total Weekly Work: 40.00 Hours
    /// MONDAY: 09:00:00-17:00:00
    /// ```
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Total Weekly Work: {:.2} Hours",
            self.total_weekly_work as f64 / 3_600.0
        );
        for day in WEEKDAYS {
            let intervals = self.day(day);
            if intervals.is_empty() {
                continue;
            }
            let spans: Vec<String> = intervals.iter().map(Interval::to_string).collect();
            let _ = write!(out, "\n{}: {}", day_name(day), spans.join(", "));
        }
        out
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `date` at `time` (UTC).  `24:00:00` maps to the next midnight.
fn at_time(date: NaiveDate, time: DayTime) -> Option<Timestamp> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight) + chrono::Duration::seconds(i64::from(time.secs())))
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}
