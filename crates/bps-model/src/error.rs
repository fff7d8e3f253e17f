use bps_calendar::CalendarError;
use bps_core::{ActivityId, AgentId};
use thiserror::Error;

/// A reference to something the configuration does not contain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("agent {0} not found")]
    Agent(AgentId),

    #[error("no agent named {0:?}")]
    AgentName(String),

    #[error("activity {0} not found")]
    Activity(ActivityId),

    #[error("no activity named {0:?}")]
    ActivityName(String),

    #[error("role {0:?} not found")]
    Role(String),

    #[error("no transition row for {0}")]
    TransitionKey(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("capacity error: {0}")]
    Capacity(String),

    #[error("invalid probabilities for {key}: {detail}")]
    Probability { key: String, detail: String },

    #[error("invalid duration model: {0}")]
    Duration(String),

    #[error("duplicate {agent} of {origin} is missing {missing}")]
    IncompleteDuplicate {
        agent:   AgentId,
        origin:  AgentId,
        missing: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ModelError {
    pub fn is_lookup(&self) -> bool {
        matches!(self, ModelError::Lookup(_))
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self, ModelError::Capacity(_))
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Failures at the serialization boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("not a serialized configuration (bad magic)")]
    BadMagic,

    #[error("unsupported configuration format version {0}")]
    UnsupportedVersion(u32),

    #[error("binary codec error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;
