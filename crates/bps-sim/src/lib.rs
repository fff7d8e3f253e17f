//! `bps-sim` — discrete-event replay of a business process configuration.
//!
//! # Stepping loop
//!
//! ```text
//! per repetition (own RNG stream, own busy map, own log):
//!   while arrivals pending or cases active:
//!     ① Admit    — one arrival, if nothing is active or the furthest
//!                  active case has reached it
//!     ② Order    — active cases by (timestamp, case id)
//!     ③ Route    — TaskRouter::next_step on the earliest case
//!     ④ Execute  — earliest-available candidate runs the activity
//!                  (or the case finishes / dead-ends)
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`case`]       | `Case`, `CaseState`                                   |
//! | [`event`]      | `SimEvent`, `RecordKind`                              |
//! | [`router`]     | `TaskRouter`, `ProbabilisticRouter`, `Step`, `DeadEnd` |
//! | [`executor`]   | `execute`, `BusyMap`                                  |
//! | [`scheduler`]  | `Scheduler`, `RunOutput`                              |
//! | [`runner`]     | `Simulation`, `RunPlan`                               |
//! | [`builder`]    | `SimBuilder`                                          |
//! | [`observer`]   | `SimObserver`, `NoopObserver`                         |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs repetitions on Rayon's thread pool.               |
//! | `fx-hash`  | FxHash for the busy map and activity index.            |

pub mod builder;
pub mod case;
pub mod error;
pub mod event;
pub mod executor;
pub mod observer;
pub mod router;
pub mod runner;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use case::{Case, CaseState};
pub use error::{SimError, SimResult};
pub use event::{RecordKind, SimEvent};
pub use executor::{BusyMap, execute};
pub use observer::{NoopObserver, SimObserver};
pub use router::{DeadEnd, ProbabilisticRouter, Step, TaskRouter};
pub use runner::{RunPlan, Simulation};
pub use scheduler::{RunOutput, Scheduler};
