// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers:
//
//   InputFormat       → a named strategy that builds a RecordReader
//                       over a list of input files (svmlight, csv)
//   RecordReader      → yields parsed Records one at a time
//   IterationListener → observes the score after each optimizer step
//
// The application layer only ever sees these traits, so a new
// input format or listener never touches the training pipeline.

use std::path::{Path, PathBuf};

use crate::domain::error::Result;
use crate::domain::record::Record;

// ─── RecordReader ─────────────────────────────────────────────────────────────
/// Sequential source of records.
pub trait RecordReader {
    /// The next record, `Ok(None)` once the input is exhausted.
    fn next_record(&mut self) -> Result<Option<Record>>;
}

// ─── InputFormat ──────────────────────────────────────────────────────────────
/// A constructible record-reading strategy.
pub trait InputFormat {
    /// Identifier the format was registered under
    fn name(&self) -> &'static str;

    /// Build a reader that walks `files` in order and produces records
    /// exactly `num_features` wide.
    ///
    /// Files are opened lazily, so a missing or unreadable file surfaces
    /// from `next_record`, not from here.
    fn create_reader(&self, files: &[PathBuf], num_features: usize) -> Result<Box<dyn RecordReader>>;
}

// ─── IterationListener ────────────────────────────────────────────────────────
/// Callback invoked by the fit loop after every optimizer step.
pub trait IterationListener {
    fn iteration_done(&mut self, iteration: usize, score: f64);
}

// ─── ParamSink ────────────────────────────────────────────────────────────────
/// Anything that persists a flat parameter vector to a path.
///
/// Implementations own the on-disk encoding; callers own the path and
/// make sure its parent directory exists.
pub trait ParamSink {
    fn write_params(&self, params: &[f32], path: &Path) -> Result<()>;
}
