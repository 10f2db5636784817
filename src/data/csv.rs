// ============================================================
// Layer 4 — CSV Record Reader
// ============================================================
// Dense comma-separated rows. The last column is the label and
// every column before it is a feature:
//
//   5.1,3.5,1.4,0.2,0       → features [5.1, 3.5, 1.4, 0.2], label 0
//   "5.1","3.5","0"         → features [5.1, 3.5], label 0
//
// Tokenizing is left to the `csv` crate, so quoted cells and
// surrounding whitespace are handled the usual way. There is no
// header row. Rows are flexible at the parser level; the width
// check happens here so the error can name the expected layout.

use std::{
    collections::VecDeque,
    fs::File,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};

use crate::domain::error::{Result, TrainError};
use crate::domain::record::Record;
use crate::domain::traits::{InputFormat, RecordReader};

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvInputFormat;

impl InputFormat for CsvInputFormat {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn create_reader(&self, files: &[PathBuf], num_features: usize) -> Result<Box<dyn RecordReader>> {
        Ok(Box::new(CsvRecordReader::new(files, num_features)))
    }
}

/// Reads `num_features + 1` numeric columns per row across several files.
pub struct CsvRecordReader {
    pending:      VecDeque<PathBuf>,
    current:      Option<(PathBuf, StringRecordsIntoIter<File>)>,
    num_features: usize,
}

impl CsvRecordReader {
    pub fn new(files: &[PathBuf], num_features: usize) -> Self {
        Self {
            pending: files.iter().cloned().collect(),
            current: None,
            num_features,
        }
    }

    fn open(path: PathBuf) -> Result<(PathBuf, StringRecordsIntoIter<File>)> {
        let file = File::open(&path)
            .map_err(|source| TrainError::InputRead { path: path.clone(), source })?;
        tracing::debug!("Reading CSV records from '{}'", path.display());

        let rows = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file)
            .into_records();
        Ok((path, rows))
    }
}

impl RecordReader for CsvRecordReader {
    fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some((path, rows)) = self.current.as_mut() {
                match rows.next() {
                    Some(Ok(row)) => {
                        // A whitespace-only line trims down to one empty cell
                        if row.iter().all(str::is_empty) {
                            continue;
                        }
                        return parse_row(path, &row, self.num_features).map(Some);
                    }
                    Some(Err(err)) => return Err(csv_error(path, err)),
                    None => self.current = None,
                }
            }

            let Some(path) = self.pending.pop_front() else {
                return Ok(None);
            };
            self.current = Some(Self::open(path)?);
        }
    }
}

fn line_of(row: &StringRecord) -> usize {
    row.position().map_or(0, |pos| pos.line() as usize)
}

fn csv_error(path: &Path, err: csv::Error) -> TrainError {
    let line    = err.position().map_or(0, |pos| pos.line() as usize);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => TrainError::InputRead { path: path.to_path_buf(), source },
        _ => TrainError::MalformedRecord { path: path.to_path_buf(), line, message },
    }
}

fn parse_row(path: &Path, row: &StringRecord, num_features: usize) -> Result<Record> {
    let malformed = |message: String| TrainError::MalformedRecord {
        path: path.to_path_buf(),
        line: line_of(row),
        message,
    };

    if row.len() != num_features + 1 {
        return Err(malformed(format!(
            "expected {} columns ({} features + label), found {}",
            num_features + 1,
            num_features,
            row.len()
        )));
    }

    let mut values = row
        .iter()
        .map(|cell| {
            cell.parse::<f64>()
                .map_err(|_| malformed(format!("'{cell}' is not a number")))
        })
        .collect::<Result<Vec<f64>>>()?;

    let label    = values.pop();
    let features = values.into_iter().map(|v| v as f32).collect();
    Ok(Record::new(features, label))
}
