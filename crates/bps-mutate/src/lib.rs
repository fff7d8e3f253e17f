//! `bps-mutate` — edit a mined configuration without re-mining it.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`patch`]   | `Patch { version, edits }`, `Edit` and its payload types   |
//! | [`apply`]   | `apply_edit`, `apply_patch`                                |
//! | [`error`]   | `MutateError`, `MutateResult<T>`                           |
//!
//! # Usage
//!
//! ```rust,no_run
//! use bps_model::Configuration;
//! use bps_mutate::{Patch, apply_patch};
//!
//! let mut config = Configuration::load_file("mined.json")?;
//! let patch = Patch::from_file("what_if.json")?;
//! apply_patch(&mut config, &patch)?;
//! config.save_file("what_if.bpsc")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Randomness used by edits (arrival re-derivation) comes from the
//! configuration's own seed, so applying a patch is reproducible.

pub mod apply;
pub mod error;
pub mod patch;


pub use apply::{apply_edit, apply_patch};
pub use error::{MutateError, MutateResult};
pub use patch::{Edit, PATCH_VERSION, Patch, PopulationChange, StepRef, TransitionEntry};
