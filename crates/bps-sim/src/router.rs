//! Task routing: what happens next to a case, and who may do it.

use std::fmt;

use bps_core::{ActivityId, AgentId, SimRng};
use bps_model::{Configuration, RoutingMode, TransitionKey};

use crate::Case;

/// Why a case could not continue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeadEnd {
    /// The routing table has no row for the case's current position.
    NoTransition,
    /// A handoff was drawn but no candidate agent can perform it.
    NoEligibleAgent(ActivityId),
    /// The case executed the configured maximum number of activities.
    StepLimit(u32),
}

impl fmt::Display for DeadEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadEnd::NoTransition => f.write_str("No transition from the current activity"),
            DeadEnd::NoEligibleAgent(_) => f.write_str("No agents to perform activity"),
            DeadEnd::StepLimit(n) => write!(f, "Step limit of {n} activities reached"),
        }
    }
}

/// Router decision for one case.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Execute `activity` with the first-available of `candidates`
    /// (preference order, never empty).
    Perform { activity: ActivityId, candidates: Vec<AgentId> },
    /// The case is done.
    Finish,
    DeadEnd(DeadEnd),
}

/// Pluggable routing policy.
///
/// The scheduler calls `next_step` once per tick for the case it is
/// advancing.  Implementations read the configuration and draw from the
/// run's RNG only; they hold no per-run state, so one router can serve
/// repetitions running on several threads.
pub trait TaskRouter: Send + Sync {
    fn next_step(
        &self,
        case:   &Case,
        config: &Configuration,
        rng:    &mut SimRng,
    ) -> Step;
}

/// Draws the next handoff from the routing table selected by the
/// configuration's [`RoutingMode`].
///
/// | Mode           | Candidates after the sampled agent                 |
/// |----------------|----------------------------------------------------|
/// | `Autonomous`   | its duplicate pool (same root original), by id     |
/// | `Orchestrated` | every agent whose activity mapping has the activity |
///
/// Deactivated agents, agents without a duration model for the activity,
/// and agents with an empty calendar are dropped from the list.
#[derive(Copy, Clone, Debug, Default)]
pub struct ProbabilisticRouter;

impl TaskRouter for ProbabilisticRouter {
    fn next_step(
        &self,
        case:   &Case,
        config: &Configuration,
        rng:    &mut SimRng,
    ) -> Step {
        let key = match case.last() {
            None => TransitionKey::Start,
            Some((agent, activity)) => TransitionKey::after(agent, activity),
        };
        let Some(row) = config.routing_table().get(&key) else {
            return Step::DeadEnd(DeadEnd::NoTransition);
        };
        let Some(handoff) = row.sample(rng) else {
            return Step::Finish;
        };
        if handoff.activity.is_terminal() {
            return Step::Finish;
        }

        let pool = match config.routing {
            RoutingMode::Autonomous => config.duplicate_pool(handoff.agent),
            RoutingMode::Orchestrated => config.performers(handoff.activity),
        };
        let candidates: Vec<AgentId> = std::iter::once(handoff.agent)
            .chain(pool.into_iter().filter(|&a| a != handoff.agent))
            .filter(|&a| config.is_eligible(a, handoff.activity))
            .collect();

        if candidates.is_empty() {
            Step::DeadEnd(DeadEnd::NoEligibleAgent(handoff.activity))
        } else {
            Step::Perform { activity: handoff.activity, candidates }
        }
    }
}
