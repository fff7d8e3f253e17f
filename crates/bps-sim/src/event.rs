//! Event log rows produced by a run.

use std::fmt;

use bps_core::{AgentId, CaseId, Timestamp};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// An executed activity.
    Activity,
    /// Marker for a failure-completed case.
    Incomplete,
    /// Time between a case's arrival and the start of its first activity.
    Waiting,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Activity => "activity",
            RecordKind::Incomplete => "incomplete",
            RecordKind::Waiting => "waiting",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a simulated event log.
#[derive(Clone, Debug, PartialEq)]
pub struct SimEvent {
    pub case_id:  CaseId,
    /// `None` on `Incomplete` and `Waiting` rows.
    pub agent:    Option<AgentId>,
    /// Resource name of the agent (empty when `agent` is `None`).
    pub resource: String,
    pub activity: String,
    pub start:    Timestamp,
    pub end:      Timestamp,
    pub kind:     RecordKind,
}
