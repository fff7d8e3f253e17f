use bps_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Zero cases or zero repetitions requested.
    #[error("capacity error: {0}")]
    Capacity(String),

    /// The configuration failed validation; nothing was simulated.
    #[error("invalid configuration: {0}")]
    Model(#[from] ModelError),
}

pub type SimResult<T> = Result<T, SimError>;
