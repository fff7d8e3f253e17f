//! `Configuration` — the aggregate every other crate works against.
//!
//! The configuration exclusively owns the agent table, role fallbacks, both
//! transition tables, the arrival series, extraneous delays, and the run
//! settings.  Editing goes
//! through `&mut Configuration` (see `bps-mutate`); a simulation run borrows
//! it immutably, so any number of repetitions can read one configuration at
//! once.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use bps_core::{ActivityId, AgentId, SimRng, Timestamp};

use crate::training::earliest_start;
use crate::{
    ActivityRegistry, AgentRecord, AgentTable, ArrivalSeries, DurationModel, ModelResult,
    RoleRecord, RoutingMode, TableKind, TrainingEvent, TransitionTable,
};

/// RNG stream reserved for arrival re-derivation.  Run repetitions use
/// streams `0..repetitions`, so this never collides with one of them.
pub const ARRIVAL_STREAM: u64 = u64::MAX;

// ── Run settings ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Cases per repetition.
    pub case_count:         u32,
    /// Independent runs per simulation request.
    pub repetitions:        u32,
    pub seed:               u64,
    /// A case that has executed this many activities is failure-completed.
    pub max_steps_per_case: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            case_count:         100,
            repetitions:        1,
            seed:               0,
            max_steps_per_case: 1_000,
        }
    }
}

// ── Duration overrides ────────────────────────────────────────────────────────

/// Persistent record of every duration override applied by an edit.  The
/// live duration maps already carry the override; the ledger keeps the
/// analyst's intent visible in the saved document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationOverrides {
    #[serde(with = "crate::pairs")]
    pub activity:       BTreeMap<ActivityId, f64>,
    #[serde(with = "crate::pairs")]
    pub agent_activity: BTreeMap<(AgentId, ActivityId), f64>,
}

impl DurationOverrides {
    pub fn is_empty(&self) -> bool {
        self.activity.is_empty() && self.agent_activity.is_empty()
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub activities:   ActivityRegistry,
    pub agents:       AgentTable,
    pub roles:        BTreeMap<String, RoleRecord>,
    pub orchestrated: TransitionTable,
    pub autonomous:   TransitionTable,
    pub routing:      RoutingMode,
    pub arrivals:     ArrivalSeries,
    pub training:     Vec<TrainingEvent>,
    pub settings:     RunSettings,
    pub deactivated:  BTreeSet<AgentId>,
    pub overrides:    DurationOverrides,
    /// Extraneous delay before an activity can be picked up, per activity.
    #[serde(default, with = "crate::pairs")]
    pub delays:       BTreeMap<ActivityId, DurationModel>,
}

impl Configuration {
    // ── Tables ────────────────────────────────────────────────────────────

    pub fn table(&self, kind: TableKind) -> &TransitionTable {
        match kind {
            TableKind::Orchestrated => &self.orchestrated,
            TableKind::Autonomous => &self.autonomous,
        }
    }

    pub fn table_mut(&mut self, kind: TableKind) -> &mut TransitionTable {
        match kind {
            TableKind::Orchestrated => &mut self.orchestrated,
            TableKind::Autonomous => &mut self.autonomous,
        }
    }

    /// The table the router reads under the current routing mode.
    pub fn routing_table(&self) -> &TransitionTable {
        self.table(self.routing.table())
    }

    // ── Agent queries ─────────────────────────────────────────────────────

    #[inline]
    pub fn is_active(&self, agent: AgentId) -> bool {
        !self.deactivated.contains(&agent)
    }

    /// The agent's own model for `activity`, else its role's.
    pub fn duration_for(&self, agent: AgentId, activity: ActivityId) -> Option<&DurationModel> {
        let record = self.agents.get(agent)?;
        record.durations.get(&activity).or_else(|| {
            let role = record.role.as_ref()?;
            self.roles.get(role)?.durations.get(&activity)
        })
    }

    /// Active, has a duration model for `activity`, and has working time.
    pub fn is_eligible(&self, agent: AgentId, activity: ActivityId) -> bool {
        let Some(record) = self.agents.get(agent) else {
            return false;
        };
        self.is_active(agent)
            && !record.calendar.is_empty()
            && self.duration_for(agent, activity).is_some()
    }

    /// `agent`'s root original and every duplicate of it, ascending id.
    pub fn duplicate_pool(&self, agent: AgentId) -> Vec<AgentId> {
        let Some(root) = self.agents.get(agent).map(AgentRecord::root) else {
            return Vec::new();
        };
        self.agents.iter().filter(|a| a.root() == root).map(|a| a.id).collect()
    }

    /// Agents whose own activity mapping contains `activity`, ascending id.
    pub fn performers(&self, activity: ActivityId) -> Vec<AgentId> {
        self.agents.iter().filter(|a| a.performs(activity)).map(|a| a.id).collect()
    }

    /// Duplicate → root original.
    pub fn origin_map(&self) -> BTreeMap<AgentId, AgentId> {
        self.agents
            .iter()
            .filter_map(|a| a.origin.map(|o| (a.id, o)))
            .collect()
    }

    /// Resource name of `agent`, or its id if unknown.
    pub fn agent_name(&self, agent: AgentId) -> String {
        self.agents.get(agent).map_or_else(|| agent.to_string(), |a| a.name.clone())
    }

    // ── Arrivals ──────────────────────────────────────────────────────────

    /// First arrival, else the earliest training case start.
    pub fn start_time(&self) -> Option<Timestamp> {
        self.arrivals.start().or_else(|| earliest_start(&self.training))
    }

    /// Generator for arrival re-derivation, fixed by the configuration seed.
    pub fn arrival_rng(&self) -> SimRng {
        SimRng::stream(self.settings.seed, ARRIVAL_STREAM)
    }

    /// Rebuild the arrival series with `count` instants from `start`, keeping
    /// the current inter-arrival model.
    pub fn rederive_arrivals(&mut self, start: Timestamp, count: usize) {
        let mut rng = self.arrival_rng();
        self.arrivals = ArrivalSeries::derive(self.arrivals.model, start, count, &mut rng);
        debug!(%start, count, "arrival series re-derived");
    }

    // ── Duplication ───────────────────────────────────────────────────────

    /// Append a deep copy of `source` under a fresh id and return the id.
    ///
    /// The copy gets its own calendar, duration map, role, outbound rows in
    /// both transition tables, and per-agent duration overrides.  Its
    /// `origin` is the root original, so duplicating a duplicate still joins
    /// the original's pool.  Inbound edges are not copied.
    pub fn clone_agent(&mut self, source: AgentId) -> ModelResult<AgentId> {
        let src = self.agents.require(source)?;
        let root = src.root();
        let root_name = self.agents.require(root)?.name.clone();
        let ordinal = self.agents.iter().filter(|a| a.origin == Some(root)).count();

        let id = self.agents.next_id();
        let record = AgentRecord {
            id,
            name: format!("DUPE_{root_name}_{}_({ordinal})", root.0),
            role: src.role.clone(),
            calendar: src.calendar.clone(),
            durations: src.durations.clone(),
            origin: Some(root),
        };
        self.agents.insert(record)?;

        self.orchestrated.copy_outbound(source, id);
        self.autonomous.copy_outbound(source, id);

        let overrides: Vec<(ActivityId, f64)> = self
            .overrides
            .agent_activity
            .iter()
            .filter(|((agent, _), _)| *agent == source)
            .map(|((_, activity), secs)| (*activity, *secs))
            .collect();
        for (activity, secs) in overrides {
            self.overrides.agent_activity.insert((id, activity), secs);
        }

        debug!(%source, duplicate = %id, "agent cloned");
        Ok(id)
    }
}
