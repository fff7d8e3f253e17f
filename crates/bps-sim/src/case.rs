//! A case travelling through the process.

use bps_core::{ActivityId, AgentId, CaseId, Timestamp};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CaseState {
    Active,
    Completed,
    /// Ended by a dead end or the step limit; the log holds an
    /// `Incomplete` row for it.
    CompletedWithFailure,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub id:      CaseId,
    /// Arrival instant.
    pub arrival: Timestamp,
    /// End of the last executed activity (the arrival before the first).
    pub now:     Timestamp,
    pub state:   CaseState,
    history:     Vec<(AgentId, ActivityId)>,
}

impl Case {
    pub fn new(id: CaseId, arrival: Timestamp) -> Self {
        Self {
            id,
            arrival,
            now: arrival,
            state: CaseState::Active,
            history: Vec::new(),
        }
    }

    /// Who did what, in execution order.
    pub fn history(&self) -> &[(AgentId, ActivityId)] {
        &self.history
    }

    pub fn last(&self) -> Option<(AgentId, ActivityId)> {
        self.history.last().copied()
    }

    /// Number of executed activities.
    #[inline]
    pub fn steps(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == CaseState::Active
    }

    pub(crate) fn record(&mut self, agent: AgentId, activity: ActivityId, end: Timestamp) {
        self.history.push((agent, activity));
        self.now = end;
    }
}
