//! The `OutputWriter` trait implemented by backend writers.

use crate::{CaseSnapshotRow, OutputResult, TickSummaryRow};

/// Trait implemented by output backends.
///
/// Errors returned here are stored by
/// [`SimOutputObserver`][crate::SimOutputObserver] and retrieved with
/// `take_error`, so the tick loop never stops on an output failure.
pub trait OutputWriter {
    /// Write a batch of case snapshots.
    fn write_snapshots(&mut self, rows: &[CaseSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
