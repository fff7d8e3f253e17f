//! Case arrivals.
//!
//! An [`ArrivalSeries`] is the time-ordered list of instants at which new
//! cases enter, together with the [`InterArrivalModel`] that produced it so
//! the series can be re-derived after an edit (new start, new length, new
//! distribution kind).  Re-derivation always anchors the first arrival at the
//! start instant and adds one sampled gap per further case.

use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use bps_core::{SimRng, Timestamp, duration_from_secs};

use crate::training::{TrainingEvent, case_starts};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterArrivalKind {
    /// Every gap equals the mean.
    #[serde(alias = "fixed-mean", alias = "mean")]
    FixedMean,
    /// Gaps drawn from a normal distribution, truncated at zero.
    Normal,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterArrivalModel {
    pub kind:      InterArrivalKind,
    pub mean_secs: f64,
    pub std_secs:  f64,
}

impl InterArrivalModel {
    pub fn fixed_mean(mean_secs: f64) -> Self {
        Self { kind: InterArrivalKind::FixedMean, mean_secs, std_secs: 0.0 }
    }

    pub fn normal(mean_secs: f64, std_secs: f64) -> Self {
        Self { kind: InterArrivalKind::Normal, mean_secs, std_secs }
    }

    /// Fit mean and standard deviation of the gaps between consecutive
    /// training case starts.  `None` with fewer than two cases.
    pub fn fit(events: &[TrainingEvent], kind: InterArrivalKind) -> Option<Self> {
        let starts = case_starts(events);
        if starts.len() < 2 {
            return None;
        }
        let gaps: Vec<f64> = starts
            .windows(2)
            .map(|w| (w[1] - w[0]).num_milliseconds() as f64 / 1_000.0)
            .collect();
        let n = gaps.len() as f64;
        let mean = gaps.iter().sum::<f64>() / n;
        let var = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;
        Some(Self { kind, mean_secs: mean, std_secs: var.sqrt() })
    }

    /// Same parameters, different kind.
    pub fn with_kind(self, kind: InterArrivalKind) -> Self {
        Self { kind, ..self }
    }

    /// One inter-arrival gap in seconds, never negative.
    pub fn sample_gap(&self, rng: &mut SimRng) -> f64 {
        let gap = match self.kind {
            InterArrivalKind::FixedMean => self.mean_secs,
            InterArrivalKind::Normal => match Normal::new(self.mean_secs, self.std_secs) {
                Ok(d) => d.sample(rng.inner()),
                Err(_) => self.mean_secs,
            },
        };
        if gap.is_nan() { 0.0 } else { gap.max(0.0) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSeries {
    pub model: InterArrivalModel,
    instants:  Vec<Timestamp>,
}

impl ArrivalSeries {
    pub fn empty(model: InterArrivalModel) -> Self {
        Self { model, instants: Vec::new() }
    }

    /// `count` arrivals starting exactly at `start`.
    pub fn derive(model: InterArrivalModel, start: Timestamp, count: usize, rng: &mut SimRng) -> Self {
        let mut series = Self { model, instants: Vec::with_capacity(count) };
        if count > 0 {
            series.instants.push(start);
            series.extend_to(count, rng);
        }
        series
    }

    /// Append sampled arrivals until the series holds `count` instants.
    /// No-op on an empty series (there is no anchor).
    pub fn extend_to(&mut self, count: usize, rng: &mut SimRng) {
        let Some(&last) = self.instants.last() else {
            return;
        };
        let mut at = last;
        while self.instants.len() < count {
            at += duration_from_secs(self.model.sample_gap(rng));
            self.instants.push(at);
        }
    }

    pub fn instants(&self) -> &[Timestamp] {
        &self.instants
    }

    /// First arrival.
    pub fn start(&self) -> Option<Timestamp> {
        self.instants.first().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }
}
