use bps_calendar::CalendarError;
use bps_model::{LookupError, ModelError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MutateError {
    /// An edit names an agent, activity, or role the configuration lacks.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    InvalidInterval(#[from] CalendarError),

    #[error("capacity error: {0}")]
    Capacity(String),

    #[error(transparent)]
    Model(ModelError),

    #[error("patch version {found} not supported (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("invalid patch document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Edit `index` of a batch failed; edits before it stay applied.
    #[error("edit {index} ({op}) failed: {source}")]
    Edit {
        index:  usize,
        op:     &'static str,
        #[source]
        source: Box<MutateError>,
    },
}

impl MutateError {
    /// The underlying error, looking through [`MutateError::Edit`].
    pub fn root(&self) -> &MutateError {
        match self {
            MutateError::Edit { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self.root(), MutateError::Lookup(_))
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self.root(), MutateError::Capacity(_))
    }

    pub fn is_invalid_interval(&self) -> bool {
        matches!(self.root(), MutateError::InvalidInterval(_))
    }
}

impl From<ModelError> for MutateError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Lookup(e) => MutateError::Lookup(e),
            ModelError::Calendar(e) => MutateError::InvalidInterval(e),
            ModelError::Capacity(msg) => MutateError::Capacity(msg),
            other => MutateError::Model(other),
        }
    }
}

pub type MutateResult<T> = Result<T, MutateError>;
