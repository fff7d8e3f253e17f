//! Activity duration models.
//!
//! A `DurationModel` is attached either to one (agent, activity) pair or to
//! a role as a fallback for every member.  Sampling never returns a negative
//! value: draws are clamped to `[max(min, 0), max]`, and parameters a
//! distribution cannot accept (zero variance for `lognormal`, a non-positive
//! mean for `exponential`, …) degrade to the mean.

use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, LogNormal, Normal};
use serde::{Deserialize, Serialize};

use bps_core::SimRng;

use crate::{ModelError, ModelResult};

/// Distribution family.  The short aliases are the names discovery writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    #[serde(alias = "fix")]
    Fixed,
    #[serde(alias = "norm")]
    Normal,
    #[serde(alias = "expon")]
    Exponential,
    Uniform,
    #[serde(alias = "lognorm")]
    Lognormal,
    Gamma,
}

/// A bounded duration distribution, all values in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DurationModel {
    pub kind: DistributionKind,
    pub mean: f64,
    pub var:  f64,
    pub min:  f64,
    pub max:  f64,
}

impl DurationModel {
    /// Validated constructor.
    pub fn new(kind: DistributionKind, mean: f64, var: f64, min: f64, max: f64) -> ModelResult<Self> {
        let model = Self { kind, mean, var, min, max };
        model.check()?;
        Ok(model)
    }

    /// Always `secs`.
    pub fn fixed(secs: f64) -> Self {
        let secs = secs.max(0.0);
        Self { kind: DistributionKind::Fixed, mean: secs, var: 0.0, min: secs, max: secs }
    }

    pub fn check(&self) -> ModelResult<()> {
        let finite = [self.mean, self.var, self.min, self.max].iter().all(|v| v.is_finite());
        if !finite {
            return Err(ModelError::Duration(format!("non-finite parameter in {self:?}")));
        }
        if self.mean < 0.0 || self.var < 0.0 || self.min < 0.0 {
            return Err(ModelError::Duration(format!("negative parameter in {self:?}")));
        }
        if self.min > self.max {
            return Err(ModelError::Duration(format!(
                "min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Draw one duration in seconds.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        let mean = self.mean;
        let std = self.var.sqrt();
        let raw = match self.kind {
            DistributionKind::Fixed => mean,
            DistributionKind::Normal => match Normal::new(mean, std) {
                Ok(d) => d.sample(rng.inner()),
                Err(_) => mean,
            },
            DistributionKind::Exponential if mean > 0.0 => match Exp::new(1.0 / mean) {
                Ok(d) => d.sample(rng.inner()),
                Err(_) => mean,
            },
            DistributionKind::Uniform if self.min < self.max => {
                rng.inner().gen_range(self.min..self.max)
            }
            DistributionKind::Lognormal if mean > 0.0 && self.var > 0.0 => {
                // Moment-match the underlying normal.
                let sigma2 = (1.0 + self.var / (mean * mean)).ln();
                match LogNormal::new(mean.ln() - sigma2 / 2.0, sigma2.sqrt()) {
                    Ok(d) => d.sample(rng.inner()),
                    Err(_) => mean,
                }
            }
            DistributionKind::Gamma if mean > 0.0 && self.var > 0.0 => {
                match Gamma::new(mean * mean / self.var, self.var / mean) {
                    Ok(d) => d.sample(rng.inner()),
                    Err(_) => mean,
                }
            }
            _ => mean,
        };
        self.clamp(raw)
    }

    fn clamp(&self, raw: f64) -> f64 {
        let lo = self.min.max(0.0);
        let hi = self.max.max(lo);
        if raw.is_nan() { self.mean.clamp(lo, hi) } else { raw.clamp(lo, hi) }
    }
}
