//! The patch document.
//!
//! ```json
//! {
//!   "version": 1,
//!   "edits": [
//!     { "op": "set_case_count", "count": 500 },
//!     { "op": "set_agent_schedule", "agent": 7, "weekday": "Mon",
//!       "intervals": [{ "start": "09:00", "end": "15:00" }] },
//!     { "op": "update_agent_population", "changes": [{ "agent": 3, "count": 0 }] }
//!   ]
//! }
//! ```
//!
//! Agents are addressed by id, activities by name.  Unknown fields and
//! unknown `op`s are rejected when the document is parsed, before anything
//! touches a configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use bps_calendar::Interval;
use bps_core::{AgentId, Timestamp, Weekday};
use bps_model::{InterArrivalKind, TableKind};

use crate::{MutateError, MutateResult};

/// The only patch schema version this crate reads.
pub const PATCH_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Patch {
    pub version: u32,
    pub edits:   Vec<Edit>,
}

impl Patch {
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { version: PATCH_VERSION, edits }
    }

    /// Parse and version-check a patch document.
    pub fn from_json(json: &str) -> MutateResult<Self> {
        let patch: Patch = serde_json::from_str(json)?;
        patch.check_version()?;
        Ok(patch)
    }

    pub fn from_file(path: impl AsRef<Path>) -> MutateResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> MutateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn check_version(&self) -> MutateResult<()> {
        if self.version != PATCH_VERSION {
            return Err(MutateError::Version { found: self.version, expected: PATCH_VERSION });
        }
        Ok(())
    }
}

/// One edit operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Edit {
    /// Re-anchor the arrival series at `timestamp`, same length and model.
    SetStartTime { timestamp: Timestamp },

    /// Switch the inter-arrival model kind and re-sample the series.
    SetInterArrivalDistribution { kind: InterArrivalKind },

    /// Change the number of cases per repetition.
    SetCaseCount { count: u32 },

    SetRepetitions { count: u32 },

    /// Fix `activity` to `seconds` for every agent and role that performs it.
    OverrideActivityDuration { activity: String, seconds: f64 },

    /// Fix (or add) `activity` for one agent.
    OverrideAgentActivityDuration { agent: AgentId, activity: String, seconds: f64 },

    SetAgentSchedule { agent: AgentId, weekday: Weekday, intervals: Vec<Interval> },

    /// Overlay entries onto one transition table.
    MergeTransitionProbabilities { table: TableKind, entries: Vec<TransitionEntry> },

    /// Per agent: 0 deactivates, n ≥ 1 activates and adds n − 1 duplicates.
    UpdateAgentPopulation { changes: Vec<PopulationChange> },

    RenameAgent { agent: AgentId, name: String },
}

impl Edit {
    /// The `op` tag, for logs and error context.
    pub fn op(&self) -> &'static str {
        match self {
            Edit::SetStartTime { .. } => "set_start_time",
            Edit::SetInterArrivalDistribution { .. } => "set_inter_arrival_distribution",
            Edit::SetCaseCount { .. } => "set_case_count",
            Edit::SetRepetitions { .. } => "set_repetitions",
            Edit::OverrideActivityDuration { .. } => "override_activity_duration",
            Edit::OverrideAgentActivityDuration { .. } => "override_agent_activity_duration",
            Edit::SetAgentSchedule { .. } => "set_agent_schedule",
            Edit::MergeTransitionProbabilities { .. } => "merge_transition_probabilities",
            Edit::UpdateAgentPopulation { .. } => "update_agent_population",
            Edit::RenameAgent { .. } => "rename_agent",
        }
    }
}

/// An agent performing a named activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepRef {
    pub agent:    AgentId,
    pub activity: String,
}

impl StepRef {
    pub fn new(agent: AgentId, activity: impl Into<String>) -> Self {
        Self { agent, activity: activity.into() }
    }
}

/// `after → to` with `probability`.  `after: None` addresses the
/// start-of-case row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionEntry {
    #[serde(default)]
    pub after:       Option<StepRef>,
    pub to:          StepRef,
    pub probability: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PopulationChange {
    pub agent: AgentId,
    pub count: u32,
}
