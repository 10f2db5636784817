// ============================================================
// Layer 4 — Line Cursor
// ============================================================
// Streams text lines across a list of input files, one file
// open at a time, remembering where each line came from so parse
// errors can point at `path:line`.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::PathBuf,
};

use crate::domain::error::{Result, TrainError};

/// A line plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

/// Sequential line reader over several files.
///
/// Only one file is open at a time. Line numbers restart at 1 for
/// each file.
pub struct LineCursor {
    pending: VecDeque<PathBuf>,
    current: Option<(PathBuf, usize, Lines<BufReader<File>>)>,
}

impl LineCursor {
    pub fn new(files: &[PathBuf]) -> Self {
        Self {
            pending: files.iter().cloned().collect(),
            current: None,
        }
    }

    /// Next line across all files; `Ok(None)` when every file is consumed.
    pub fn next_line(&mut self) -> Result<Option<SourceLine>> {
        loop {
            if let Some((path, line_no, lines)) = self.current.as_mut() {
                match lines.next() {
                    Some(Ok(text)) => {
                        *line_no += 1;
                        return Ok(Some(SourceLine { path: path.clone(), line: *line_no, text }));
                    }
                    Some(Err(source)) => {
                        return Err(TrainError::InputRead { path: path.clone(), source });
                    }
                    // Dropping the reader closes the file before the next one opens
                    None => self.current = None,
                }
            }

            let Some(path) = self.pending.pop_front() else {
                return Ok(None);
            };
            let file = File::open(&path)
                .map_err(|source| TrainError::InputRead { path: path.clone(), source })?;
            tracing::debug!("Reading records from '{}'", path.display());
            self.current = Some((path, 0, BufReader::new(file).lines()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::split::FileSplit;
    use std::fs;

    #[test]
    fn test_lines_span_files_with_origins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        fs::write(dir.path().join("b.txt"), "three\n").unwrap();

        let split      = FileSplit::new(dir.path()).unwrap();
        let mut cursor = LineCursor::new(split.files());

        let mut seen = Vec::new();
        while let Some(line) = cursor.next_line().unwrap() {
            seen.push((line.path.file_name().unwrap().to_owned(), line.line, line.text));
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].1, 2);
        assert_eq!(seen[2].0, "b.txt");
        assert_eq!(seen[2].1, 1);
        assert_eq!(seen[2].2, "three");
    }
}
