//! `bps-core` — foundational types for the `bps` business process simulator.
//!
//! This crate is a dependency of every other `bps-*` crate.  It intentionally
//! has no `bps-*` dependencies and minimal external ones (`chrono`, `rand`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ActivityId`, `CaseId`                     |
//! | [`time`]        | `Timestamp`, `DayTime`, weekday helpers               |
//! | [`rng`]         | `SimRng` (one seedable generator per run / stream)    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types;        |
//! |         | required by `bps-model` (configuration codec).             |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{ActivityId, AgentId, CaseId};
pub use rng::SimRng;
pub use time::{DayTime, Timestamp, WEEKDAYS, Weekday, duration_from_secs, weekday_index};
