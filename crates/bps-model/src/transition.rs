//! Probabilistic handoff tables.
//!
//! A row maps a [`TransitionKey`] (where the case is) to a distribution over
//! [`Handoff`]s (who does what next).  Per row the probabilities sum to at
//! most one; the remainder is the chance that the case ends there.
//!
//! Rows and entries live in `BTreeMap`s so a draw walks handoffs in the same
//! order on every run: with a fixed seed the outcome is reproducible.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use bps_core::{ActivityId, AgentId, SimRng};

use crate::{ModelError, ModelResult};

/// Slack allowed on a row's probability sum.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Where a case currently is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKey {
    /// A fresh case that has not executed anything yet.
    Start,
    /// `agent` just finished `activity`.
    After { agent: AgentId, activity: ActivityId },
}

impl TransitionKey {
    pub fn after(agent: AgentId, activity: ActivityId) -> Self {
        TransitionKey::After { agent, activity }
    }

    pub fn agent(&self) -> Option<AgentId> {
        match self {
            TransitionKey::Start => None,
            TransitionKey::After { agent, .. } => Some(*agent),
        }
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKey::Start => f.write_str("Start"),
            TransitionKey::After { agent, activity } => write!(f, "After({agent}, {activity})"),
        }
    }
}

/// Who performs which activity next.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handoff {
    pub agent:    AgentId,
    pub activity: ActivityId,
}

impl Handoff {
    pub fn new(agent: AgentId, activity: ActivityId) -> Self {
        Self { agent, activity }
    }
}

// ── HandoffDistribution ───────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandoffDistribution {
    #[serde(with = "crate::pairs")]
    probs: BTreeMap<Handoff, f64>,
}

impl HandoffDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, handoff: Handoff, probability: f64) {
        self.probs.insert(handoff, probability);
    }

    pub fn get(&self, handoff: &Handoff) -> Option<f64> {
        self.probs.get(handoff).copied()
    }

    pub fn total(&self) -> f64 {
        self.probs.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Handoff, f64)> + '_ {
        self.probs.iter().map(|(h, &p)| (h, p))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Draw a handoff.  `None` means the draw fell into the residual mass.
    pub fn sample(&self, rng: &mut SimRng) -> Option<Handoff> {
        let u = rng.unit();
        let mut cumulative = 0.0;
        for (handoff, &p) in &self.probs {
            cumulative += p;
            if u < cumulative {
                return Some(*handoff);
            }
        }
        None
    }

    /// Each probability in `[0, 1]`, sum at most one.
    pub fn check(&self, key: &TransitionKey) -> ModelResult<()> {
        let bad = |detail: String| ModelError::Probability { key: key.to_string(), detail };
        for (handoff, &p) in &self.probs {
            if !(0.0..=1.0).contains(&p) {
                return Err(bad(format!(
                    "probability {p} for ({}, {}) outside [0, 1]",
                    handoff.agent, handoff.activity
                )));
            }
        }
        let total = self.total();
        if total > 1.0 + PROBABILITY_TOLERANCE {
            return Err(bad(format!("probabilities sum to {total}")));
        }
        Ok(())
    }
}

// ── TransitionTable ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable {
    #[serde(with = "crate::pairs")]
    rows: BTreeMap<TransitionKey, HandoffDistribution>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TransitionKey) -> Option<&HandoffDistribution> {
        self.rows.get(key)
    }

    /// Row for `key`, created empty if absent.
    pub fn row_mut(&mut self, key: TransitionKey) -> &mut HandoffDistribution {
        self.rows.entry(key).or_default()
    }

    pub fn set(&mut self, key: TransitionKey, handoff: Handoff, probability: f64) {
        self.row_mut(key).set(handoff, probability);
    }

    pub fn rows(&self) -> impl Iterator<Item = (&TransitionKey, &HandoffDistribution)> + '_ {
        self.rows.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows keyed `After { agent, .. }`, in activity order.
    pub fn outbound(&self, agent: AgentId) -> impl Iterator<Item = (ActivityId, &HandoffDistribution)> + '_ {
        let lo = TransitionKey::after(agent, ActivityId(0));
        let hi = TransitionKey::after(agent, ActivityId(u16::MAX));
        self.rows.range(lo..=hi).filter_map(|(key, dist)| match key {
            TransitionKey::After { activity, .. } => Some((*activity, dist)),
            TransitionKey::Start => None,
        })
    }

    /// Copy every outbound row of `from` to `to`, replacing any rows `to`
    /// already had for the same activities.
    pub fn copy_outbound(&mut self, from: AgentId, to: AgentId) {
        let copied: Vec<(ActivityId, HandoffDistribution)> = self
            .outbound(from)
            .map(|(activity, dist)| (activity, dist.clone()))
            .collect();
        for (activity, dist) in copied {
            self.rows.insert(TransitionKey::after(to, activity), dist);
        }
    }

    /// Overlay `patch` entry by entry; keys and handoffs are created as
    /// needed, unmentioned entries are kept.  Applying the same patch twice
    /// leaves the table as applying it once.
    pub fn merge(&mut self, patch: &TransitionTable) {
        for (key, dist) in &patch.rows {
            let row = self.row_mut(*key);
            for (handoff, p) in dist.iter() {
                row.set(*handoff, p);
            }
        }
    }
}

/// Which of the two parallel tables an operation addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Orchestrated,
    Autonomous,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableKind::Orchestrated => "orchestrated",
            TableKind::Autonomous => "autonomous",
        })
    }
}

/// How the router picks candidates.  Also selects the table it reads.
///
/// - `Autonomous`: handoffs name concrete agents; the candidate pool is the
///   sampled agent and its duplicates.
/// - `Orchestrated`: the sampled agent is a preference; any agent able to
///   perform the activity may take the work.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    #[default]
    Autonomous,
    Orchestrated,
}

impl RoutingMode {
    pub fn table(self) -> TableKind {
        match self {
            RoutingMode::Autonomous => TableKind::Autonomous,
            RoutingMode::Orchestrated => TableKind::Orchestrated,
        }
    }
}
