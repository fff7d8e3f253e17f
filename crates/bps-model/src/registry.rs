//! `ActivityRegistry` — interns activity names into compact `ActivityId`s.
//!
//! Index 0 is always the terminal marker [`TERMINAL_NAME`]; a registry can
//! not be constructed (or deserialized) without it.  Ids are stable for the
//! life of a configuration: names are only ever appended.

use serde::{Deserialize, Serialize};

use bps_core::ActivityId;

use crate::{LookupError, ModelError, ModelResult};

#[cfg(feature = "fx-hash")]
type NameIndex = rustc_hash::FxHashMap<String, ActivityId>;
#[cfg(not(feature = "fx-hash"))]
type NameIndex = std::collections::HashMap<String, ActivityId>;

/// Name of the reserved activity that ends a case.
pub const TERMINAL_NAME: &str = "zzz_end";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct ActivityRegistry {
    names: Vec<String>,
    index: NameIndex,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        let mut reg = Self { names: Vec::new(), index: NameIndex::default() };
        reg.names.push(TERMINAL_NAME.to_owned());
        reg.index.insert(TERMINAL_NAME.to_owned(), ActivityId::TERMINAL);
        reg
    }

    /// Return the id for `name`, registering it if it is new.
    pub fn intern(&mut self, name: &str) -> ModelResult<ActivityId> {
        if let Some(&id) = self.index.get(name) {
            return Ok(id);
        }
        let id = u16::try_from(self.names.len())
            .map(ActivityId)
            .map_err(|_| ModelError::Capacity(format!("more than {} activities", u16::MAX)))?;
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<ActivityId> {
        self.index.get(name).copied()
    }

    /// Like [`get`](Self::get) but a missing name is a lookup error.
    pub fn require(&self, name: &str) -> Result<ActivityId, LookupError> {
        self.get(name).ok_or_else(|| LookupError::ActivityName(name.to_owned()))
    }

    pub fn name(&self, id: ActivityId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Display name, falling back to the id for unknown activities.
    pub fn label(&self, id: ActivityId) -> String {
        self.name(id).map_or_else(|| id.to_string(), str::to_owned)
    }

    #[inline]
    pub fn contains(&self, id: ActivityId) -> bool {
        id.index() < self.names.len()
    }

    pub fn check(&self, id: ActivityId) -> Result<(), LookupError> {
        if self.contains(id) { Ok(()) } else { Err(LookupError::Activity(id)) }
    }

    /// Number of registered activities, terminal included.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`: the terminal marker is permanently registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(id, name)` pairs in id order, terminal first.
    pub fn iter(&self) -> impl Iterator<Item = (ActivityId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (ActivityId(i as u16), n.as_str()))
    }
}

impl Default for ActivityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The index is derived from `names`.
impl PartialEq for ActivityRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl From<ActivityRegistry> for Vec<String> {
    fn from(reg: ActivityRegistry) -> Self {
        reg.names
    }
}

impl TryFrom<Vec<String>> for ActivityRegistry {
    type Error = ModelError;

    fn try_from(names: Vec<String>) -> ModelResult<Self> {
        if names.first().map(String::as_str) != Some(TERMINAL_NAME) {
            return Err(ModelError::Config(format!(
                "activity registry must start with {TERMINAL_NAME:?}"
            )));
        }
        let mut reg = Self::new();
        for name in &names[1..] {
            let before = reg.len();
            reg.intern(name)?;
            if reg.len() == before {
                return Err(ModelError::Config(format!("activity {name:?} registered twice")));
            }
        }
        Ok(reg)
    }
}
