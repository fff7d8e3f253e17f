//! `bps-output` — event log writers for simulated runs.
//!
//! | Backend | Files created                                   |
//! |---------|-------------------------------------------------|
//! | CSV     | `simulated_log_<repetition>.csv`, one per run   |
//!
//! Columns: `case_id, agent, resource, activity, start_timestamp,
//! end_timestamp, kind`.  Timestamps are RFC 3339 in UTC; `kind` is
//! `activity`, `waiting`, or `incomplete`.
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`EventLogObserver`], which implements `bps_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bps_output::EventLogObserver;
//!
//! let runs = sim.run_with(|rep| EventLogObserver::csv(Path::new("./out"), rep));
//! for (_, mut obs) in runs {
//!     obs.take_error().map(|e| eprintln!("output error: {e}"));
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::{CsvWriter, log_file_name, write_logs};
pub use error::{OutputError, OutputResult};
pub use observer::EventLogObserver;
pub use row::{EVENT_LOG_HEADER, EventRow, format_timestamp};
pub use writer::OutputWriter;
