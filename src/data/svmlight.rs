// ============================================================
// Layer 4 — SVMLight Record Reader
// ============================================================
// Parses the sparse SVMLight / LibSVM text format:
//
//   <label> <index>:<value> <index>:<value> ... [# comment]
//
// Indices are 1-based and expand into a dense vector of the
// configured width; absent indices are zero. Blank lines and
// lines that are only a comment are skipped.
//
// Example:
//   "2 1:0.5 4:1.0" with width 4 → label 2.0, features [0.5, 0, 0, 1.0]

use std::path::PathBuf;

use crate::data::lines::{LineCursor, SourceLine};
use crate::domain::error::{Result, TrainError};
use crate::domain::record::Record;
use crate::domain::traits::{InputFormat, RecordReader};

/// Input format for SVMLight text files.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvmLightInputFormat;

impl InputFormat for SvmLightInputFormat {
    fn name(&self) -> &'static str {
        "svmlight"
    }

    fn create_reader(&self, files: &[PathBuf], num_features: usize) -> Result<Box<dyn RecordReader>> {
        Ok(Box::new(SvmLightRecordReader::new(files, num_features)))
    }
}

/// Streams dense records out of SVMLight files, one line at a time.
///
/// The configured width is authoritative: an index past it is an error
/// rather than a silently widened vector.
pub struct SvmLightRecordReader {
    cursor:       LineCursor,
    num_features: usize,
}

impl SvmLightRecordReader {
    pub fn new(files: &[PathBuf], num_features: usize) -> Self {
        Self { cursor: LineCursor::new(files), num_features }
    }
}

impl RecordReader for SvmLightRecordReader {
    fn next_record(&mut self) -> Result<Option<Record>> {
        while let Some(line) = self.cursor.next_line()? {
            if let Some(record) = parse_line(&line, self.num_features)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

/// Parse one line. `Ok(None)` for lines with no data.
fn parse_line(line: &SourceLine, num_features: usize) -> Result<Option<Record>> {
    let malformed = |message: String| TrainError::MalformedRecord {
        path: line.path.clone(),
        line: line.line,
        message,
    };

    let data = line.text.split('#').next().unwrap_or("").trim();
    if data.is_empty() {
        return Ok(None);
    }

    let mut tokens = data.split_whitespace();
    let label_token = tokens.next().unwrap_or_default();
    let label: f64 = label_token
        .parse()
        .map_err(|_| malformed(format!("label '{label_token}' is not a number")))?;

    let mut features = vec![0.0f32; num_features];
    for token in tokens {
        let (index, value) = token
            .split_once(':')
            .ok_or_else(|| malformed(format!("expected index:value, found '{token}'")))?;

        // "qid:" pairs are ranking metadata, not features
        if index == "qid" {
            continue;
        }

        let index: usize = index
            .parse()
            .map_err(|_| malformed(format!("feature index '{index}' is not a positive integer")))?;
        if index == 0 || index > num_features {
            return Err(malformed(format!(
                "feature index {index} outside 1..={num_features}"
            )));
        }
        let value: f32 = value
            .parse()
            .map_err(|_| malformed(format!("feature value '{value}' is not a number")))?;

        features[index - 1] = value;
    }

    Ok(Some(Record::new(features, Some(label))))
}
