//! Normalized agent storage.
//!
//! Everything the simulator knows about one resource lives in a single
//! [`AgentRecord`]: its calendar, its per-activity duration models (whose key
//! set *is* the agent's activity mapping), its role, and, for duplicates, the
//! original it was cloned from.  [`AgentTable`] keys records by `AgentId` in
//! an ordered map because ids are sparse once duplicates are appended.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bps_calendar::ResourceCalendar;
use bps_core::{ActivityId, AgentId};

use crate::{DurationModel, LookupError, ModelError, ModelResult};

// ── AgentRecord ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id:        AgentId,
    /// Resource name as it appears in the event log.
    pub name:      String,
    pub role:      Option<String>,
    pub calendar:  ResourceCalendar,
    #[serde(with = "crate::pairs")]
    pub durations: BTreeMap<ActivityId, DurationModel>,
    /// Root original agent, set only on duplicates.
    pub origin:    Option<AgentId>,
}

impl AgentRecord {
    pub fn new(id: AgentId, name: impl Into<String>, calendar: ResourceCalendar) -> Self {
        Self {
            id,
            name: name.into(),
            role: None,
            calendar,
            durations: BTreeMap::new(),
            origin: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_duration(mut self, activity: ActivityId, model: DurationModel) -> Self {
        self.durations.insert(activity, model);
        self
    }

    /// `true` if `activity` is in this agent's own activity mapping.
    #[inline]
    pub fn performs(&self, activity: ActivityId) -> bool {
        self.durations.contains_key(&activity)
    }

    #[inline]
    pub fn is_duplicate(&self) -> bool {
        self.origin.is_some()
    }

    /// The original this agent descends from (itself for originals).
    #[inline]
    pub fn root(&self) -> AgentId {
        self.origin.unwrap_or(self.id)
    }
}

// ── AgentTable ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<AgentRecord>", try_from = "Vec<AgentRecord>")]
pub struct AgentTable {
    agents: BTreeMap<AgentId, AgentRecord>,
}

impl AgentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` under its own id.  Rejects an id already in use.
    pub fn insert(&mut self, record: AgentRecord) -> ModelResult<()> {
        if self.agents.contains_key(&record.id) {
            return Err(ModelError::Config(format!("agent {} registered twice", record.id)));
        }
        self.agents.insert(record.id, record);
        Ok(())
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        self.agents.get_mut(&id)
    }

    pub fn require(&self, id: AgentId) -> Result<&AgentRecord, LookupError> {
        self.agents.get(&id).ok_or(LookupError::Agent(id))
    }

    pub fn require_mut(&mut self, id: AgentId) -> Result<&mut AgentRecord, LookupError> {
        self.agents.get_mut(&id).ok_or(LookupError::Agent(id))
    }

    pub fn check(&self, id: AgentId) -> Result<(), LookupError> {
        self.require(id).map(|_| ())
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    /// First agent with resource name `name`, in id order.
    pub fn by_name(&self, name: &str) -> Option<&AgentRecord> {
        self.agents.values().find(|a| a.name == name)
    }

    /// Next free id: one past the current maximum, or 0 for an empty table.
    pub fn next_id(&self) -> AgentId {
        self.agents
            .keys()
            .next_back()
            .map_or(AgentId(0), |id| AgentId(id.0 + 1))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> + '_ {
        self.agents.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }
}

impl From<AgentTable> for Vec<AgentRecord> {
    fn from(table: AgentTable) -> Self {
        table.agents.into_values().collect()
    }
}

impl TryFrom<Vec<AgentRecord>> for AgentTable {
    type Error = ModelError;

    fn try_from(records: Vec<AgentRecord>) -> ModelResult<Self> {
        let mut table = AgentTable::new();
        for record in records {
            table.insert(record)?;
        }
        Ok(table)
    }
}

// ── Roles ─────────────────────────────────────────────────────────────────────

/// Role-level duration fallback shared by every member of the role.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    #[serde(with = "crate::pairs")]
    pub durations: BTreeMap<ActivityId, DurationModel>,
}
