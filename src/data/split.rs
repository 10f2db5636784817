// ============================================================
// Layer 4 — Input Split
// ============================================================
// Resolves the configured input path into the ordered list of
// files a record reader should walk.
//
//   file      → that single file
//   directory → every regular file below it, sorted, recursively
//
// Sorting keeps runs reproducible regardless of directory order.
// Symlinks to files are read; symlinks to directories are not
// descended into, so a link back to an ancestor cannot loop.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{Result, TrainError};

/// The set of files backing one training input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSplit {
    root:  PathBuf,
    files: Vec<PathBuf>,
}

impl FileSplit {
    /// Resolve `root` into the files to read.
    ///
    /// A missing or unreadable root fails here with `InputRead`, before
    /// any reader is built. An empty directory is a valid, empty split.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let meta = fs::metadata(&root)
            .map_err(|source| TrainError::InputRead { path: root.clone(), source })?;

        let mut files = Vec::new();
        if meta.is_dir() {
            collect_files(&root, &mut files)?;
            files.sort();
        } else {
            files.push(root.clone());
        }

        tracing::debug!("Input split '{}' has {} file(s)", root.display(), files.len());
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files in read order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .map_err(|source| TrainError::InputRead { path: dir.to_path_buf(), source })?;

    for entry in entries {
        let entry = entry
            .map_err(|source| TrainError::InputRead { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        let kind = entry
            .file_type()
            .map_err(|source| TrainError::InputRead { path: path.clone(), source })?;

        if kind.is_dir() {
            collect_files(&path, out)?;
        } else if kind.is_file() {
            out.push(path);
        } else if kind.is_symlink() {
            if path.is_file() {
                out.push(path);
            } else {
                tracing::debug!("Skipping directory link '{}'", path.display());
            }
        }
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_split() {
        let dir  = tempfile::tempdir().unwrap();
        let file = dir.path().join("train.svm");
        fs::write(&file, "1 1:0.5\n").unwrap();

        let split = FileSplit::new(&file).unwrap();
        assert_eq!(split.files(), &[file]);
    }

    #[test]
    fn test_directory_split_is_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.svm"), "").unwrap();
        fs::write(dir.path().join("a.svm"), "").unwrap();
        fs::write(dir.path().join("nested").join("c.svm"), "").unwrap();

        let split = FileSplit::new(dir.path()).unwrap();
        let names: Vec<_> = split
            .files()
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a.svm"), PathBuf::from("b.svm"), PathBuf::from("nested/c.svm")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.svm"), "").unwrap();
        fs::write(dir.path().join("target.svm"), "").unwrap();
        symlink(dir.path(), dir.path().join("loop")).unwrap();
        symlink(dir.path().join("target.svm"), dir.path().join("linked.svm")).unwrap();

        let split = FileSplit::new(dir.path()).unwrap();
        let names: Vec<_> = split
            .files()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.svm", "linked.svm", "target.svm"]);
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSplit::new(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, TrainError::InputRead { .. }));
    }
}
