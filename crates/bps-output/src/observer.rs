//! `EventLogObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use std::path::Path;

use tracing::{debug, warn};

use bps_sim::{SimEvent, SimObserver};

use crate::csv::CsvWriter;
use crate::writer::OutputWriter;
use crate::{EventRow, OutputError, OutputResult};

/// A [`SimObserver`] that streams a repetition's event log to an
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct EventLogObserver<W: OutputWriter> {
    /// `None` when the backend could not be opened; the open error is then
    /// held in `last_error` and every callback is a no-op.
    writer:     Option<W>,
    rows:       usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> EventLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Some(writer), rows: 0, last_error: None }
    }

    /// Wrap the result of opening a backend.  An `Err` is kept and reported
    /// through [`take_error`][Self::take_error] after the run.
    pub fn open(writer: OutputResult<W>) -> Self {
        match writer {
            Ok(w) => Self::new(w),
            Err(e) => Self { writer: None, rows: 0, last_error: Some(e) },
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Rows handed to the writer so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> Option<W> {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl EventLogObserver<CsvWriter> {
    /// Observer writing `simulated_log_<repetition>.csv` under `dir`.
    pub fn csv(dir: &Path, repetition: u32) -> Self {
        Self::open(CsvWriter::new(dir, repetition))
    }
}

impl<W: OutputWriter> SimObserver for EventLogObserver<W> {
    fn on_event(&mut self, event: &SimEvent) {
        let Some(writer) = self.writer.as_mut() else { return };
        let result = writer.write_events(&[EventRow::from(event)]);
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, repetition: u32, cases: usize) {
        let Some(writer) = self.writer.as_mut() else {
            warn!(repetition, "event log was never opened");
            return;
        };
        let result = writer.finish();
        self.store_err(result);
        debug!(repetition, cases, rows = self.rows, "event log closed");
    }
}
