//! `bps-model` — the simulation configuration and its serialization boundary.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`registry`]    | `ActivityRegistry` (name ↔ `ActivityId`, terminal at 0)      |
//! | [`duration`]    | `DurationModel`, `DistributionKind`                          |
//! | [`agent`]       | `AgentRecord`, `AgentTable`, `RoleRecord`                    |
//! | [`transition`]  | `TransitionKey`, `Handoff`, `TransitionTable`, routing mode  |
//! | [`arrival`]     | `ArrivalSeries`, `InterArrivalModel`                         |
//! | [`training`]    | `TrainingEvent` and start-time helpers                       |
//! | [`config`]      | `Configuration`, `RunSettings`, `clone_agent`                |
//! | [`builder`]     | `ConfigurationBuilder`                                       |
//! | [`codec`]       | bytes / JSON encodings, file load and save                  |
//! | [`validate`]    | `Configuration::validate`                                    |
//! | [`error`]       | `LookupError`, `ModelError`, `CodecError`                    |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash for the activity-name index instead of SipHash.  |

pub mod agent;
pub mod arrival;
pub mod builder;
pub mod codec;
pub mod config;
pub mod duration;
pub mod error;
pub mod registry;
pub mod training;
pub mod transition;
pub mod validate;

mod pairs;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{AgentRecord, AgentTable, RoleRecord};
pub use arrival::{ArrivalSeries, InterArrivalKind, InterArrivalModel};
pub use builder::ConfigurationBuilder;
pub use codec::FORMAT_VERSION;
pub use config::{ARRIVAL_STREAM, Configuration, DurationOverrides, RunSettings};
pub use duration::{DistributionKind, DurationModel};
pub use error::{CodecError, CodecResult, LookupError, ModelError, ModelResult};
pub use registry::{ActivityRegistry, TERMINAL_NAME};
pub use training::TrainingEvent;
pub use transition::{
    Handoff, HandoffDistribution, PROBABILITY_TOLERANCE, RoutingMode, TableKind, TransitionKey,
    TransitionTable,
};
pub use validate::check_override;
