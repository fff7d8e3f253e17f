//! CSV output backend.
//!
//! One file per repetition, `simulated_log_<repetition>.csv`, in the
//! configured output directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;

use bps_sim::RunOutput;

use crate::writer::OutputWriter;
use crate::{EVENT_LOG_HEADER, EventRow, OutputResult};

/// File name of repetition `repetition`'s event log.
pub fn log_file_name(repetition: u32) -> String {
    format!("simulated_log_{repetition}.csv")
}

/// Writes one repetition's event log to a CSV file.
pub struct CsvWriter {
    log:      Writer<File>,
    path:     PathBuf,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the repetition's log file, and write the
    /// header row.
    pub fn new(dir: &Path, repetition: u32) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(log_file_name(repetition));
        let mut log = Writer::from_path(&path)?;
        log.write_record(EVENT_LOG_HEADER)?;
        Ok(Self { log, path, finished: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.log.write_record(row.fields())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.log.flush()?;
        Ok(())
    }
}

/// Write already-collected run outputs, one file each.  Returns the paths
/// in repetition order.
pub fn write_logs(dir: &Path, outputs: &[RunOutput]) -> OutputResult<Vec<PathBuf>> {
    outputs
        .iter()
        .map(|out| {
            let mut writer = CsvWriter::new(dir, out.repetition)?;
            let rows: Vec<EventRow> = out.log.iter().map(EventRow::from).collect();
            writer.write_events(&rows)?;
            writer.finish()?;
            Ok(writer.path)
        })
        .collect()
}
