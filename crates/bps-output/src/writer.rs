//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EventRow, OutputResult};

/// Trait implemented by event log writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`EventLogObserver::take_error`][crate::EventLogObserver::take_error].
pub trait OutputWriter {
    /// Append rows to the log.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
