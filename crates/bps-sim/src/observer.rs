//! Simulation observer trait for progress reporting and log collection.

use crate::{Case, SimEvent};

/// Callbacks invoked by the scheduler while one repetition runs.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Each repetition gets its own observer
/// (see [`Simulation::run_with`][crate::Simulation::run_with]).
///
/// # Example: failure counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Failures(usize);
///
/// impl SimObserver for Failures {
///     fn on_case_completed(&mut self, case: &Case) {
///         if case.state == CaseState::CompletedWithFailure {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first tick of repetition `repetition`.
    fn on_run_start(&mut self, _repetition: u32) {}

    /// A pending arrival became an active case.
    fn on_case_admitted(&mut self, _case: &Case) {}

    /// A row was appended to the event log (activity or incomplete marker).
    fn on_event(&mut self, _event: &SimEvent) {}

    /// A case reached `Completed` or `CompletedWithFailure`.
    fn on_case_completed(&mut self, _case: &Case) {}

    /// Called once after the last case completed.
    fn on_run_end(&mut self, _repetition: u32, _cases: usize) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
