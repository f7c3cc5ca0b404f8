//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `case_snapshots.csv`
//! - `tick_summaries.csv`
//!
//! Optional columns (`next_node`, `stage_index`) are written as empty fields
//! when absent.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CaseSnapshotRow, OutputError, OutputResult, TickSummaryRow};

pub const CASE_SNAPSHOT_HEADER: [&str; 9] = [
    "frame", "time_ms", "case_id", "state", "node", "next_node", "stage_index", "progress", "frozen",
];

pub const TICK_SUMMARY_HEADER: [&str; 8] = [
    "frame",
    "time_ms",
    "active_particles",
    "completed_particles",
    "throughput_per_sec",
    "active_cases",
    "completed_cases",
    "frozen_cases",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the two CSV files, and
    /// write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("case_snapshots.csv"))?;
        snapshots.write_record(CASE_SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TICK_SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }

    fn check_open(&self) -> OutputResult<()> {
        if self.finished { Err(OutputError::Finished) } else { Ok(()) }
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[CaseSnapshotRow]) -> OutputResult<()> {
        self.check_open()?;
        for row in rows {
            self.snapshots.write_record(&[
                row.frame.to_string(),
                row.time_ms.to_string(),
                row.case_id.to_string(),
                row.state.to_owned(),
                row.node.to_string(),
                opt(row.next_node),
                opt(row.stage_index),
                format!("{:.4}", row.progress),
                (row.frozen as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.check_open()?;
        self.summaries.write_record(&[
            row.frame.to_string(),
            row.time_ms.to_string(),
            row.active_particles.to_string(),
            row.completed_particles.to_string(),
            format!("{:.3}", row.throughput_per_sec),
            row.active_cases.to_string(),
            row.completed_cases.to_string(),
            row.frozen_cases.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
