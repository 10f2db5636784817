// ============================================================
// Layer 6 — Parameter Writers
// ============================================================
// Persists the flattened parameter vector of a trained network.
//
// Binary layout (all big-endian):
//   i64          element count N
//   f32 × N      parameter values
//
// Text layout:
//   v0,v1,...,vN-1\n
//
// File naming convention for the multi-layer branch:
//   <output directory>/
//     outputmodel.bin   ← binary save mode
//     outputmodel.txt   ← any other save mode
//
// The single-layer branch writes straight to the configured
// output path instead (see application::local_trainer).

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::config::SaveMode;
use crate::domain::error::{Result, TrainError};
use crate::domain::traits::ParamSink;

pub const BINARY_MODEL_FILENAME: &str = "outputmodel.bin";
pub const TEXT_MODEL_FILENAME: &str = "outputmodel.txt";

/// Length-prefixed big-endian f32 writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryParamWriter;

/// Comma-delimited text writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextParamWriter;

impl ParamSink for BinaryParamWriter {
    fn write_params(&self, params: &[f32], path: &Path) -> Result<()> {
        let write_error = |source| TrainError::Write { path: path.to_path_buf(), source };

        let file    = File::create(path).map_err(write_error)?;
        let mut out = BufWriter::new(file);

        out.write_all(&(params.len() as i64).to_be_bytes()).map_err(write_error)?;
        for value in params {
            out.write_all(&value.to_be_bytes()).map_err(write_error)?;
        }
        // Flush explicitly so a failed final write is reported, not lost in Drop
        out.flush().map_err(write_error)?;
        Ok(())
    }
}

impl ParamSink for TextParamWriter {
    fn write_params(&self, params: &[f32], path: &Path) -> Result<()> {
        let write_error = |source| TrainError::Write { path: path.to_path_buf(), source };

        let file    = File::create(path).map_err(write_error)?;
        let mut out = BufWriter::new(file);

        let line = params
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(out, "{line}").map_err(write_error)?;
        out.flush().map_err(write_error)?;
        Ok(())
    }
}

/// The writer for a save mode.
///
/// `Binary` → length-prefixed big-endian floats, `Text` → one
/// comma-joined line. Both write the values in the order given.
pub fn sink_for(mode: SaveMode) -> Box<dyn ParamSink> {
    match mode {
        SaveMode::Binary => Box::new(BinaryParamWriter),
        SaveMode::Text   => Box::new(TextParamWriter),
    }
}

/// Multi-layer target: a fixed file name inside the output directory.
///
///   /out, Text   → /out/outputmodel.txt
///   /out, Binary → /out/outputmodel.bin
pub fn model_file_in(output_directory: &Path, mode: SaveMode) -> PathBuf {
    let name = match mode {
        SaveMode::Binary => BINARY_MODEL_FILENAME,
        SaveMode::Text   => TEXT_MODEL_FILENAME,
    };
    output_directory.join(name)
}

/// Write `params` to `path`, creating missing parent directories first.
///
/// An existing file is overwritten. Any I/O failure, including a plain
/// file sitting where a parent directory should be, is reported as
/// `TrainError::Write` with the path that was being written.
pub fn save_params(params: &[f32], path: &Path, mode: SaveMode) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| TrainError::Write { path: parent.to_path_buf(), source })?;
    }
    sink_for(mode).write_params(params, path)?;
    tracing::info!("Saved {} parameters to '{}'", params.len(), path.display());
    Ok(())
}

/// Read back a binary parameter file.
#[cfg(test)]
pub fn read_binary_params(path: &Path) -> std::io::Result<Vec<f32>> {
    let bytes = fs::read(path)?;
    let (len, body) = bytes.split_at(8);
    let len = i64::from_be_bytes(len.try_into().unwrap()) as usize;
    assert_eq!(body.len(), len * 4, "payload length does not match prefix");
    Ok(body
        .chunks_exact(4)
        .map(|c| f32::from_be_bytes(c.try_into().unwrap()))
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.bin");
        BinaryParamWriter.write_params(&[1.5, -0.25, 3.0], &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 8 + 3 * 4);
        assert_eq!(&bytes[..8], &3i64.to_be_bytes());
        assert_eq!(read_binary_params(&path).unwrap(), vec![1.5, -0.25, 3.0]);
    }

    #[test]
    fn test_text_is_comma_delimited() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.txt");
        TextParamWriter.write_params(&[1.5, -0.25, 3.0], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1.5,-0.25,3\n");
    }

    #[test]
    fn test_model_file_names() {
        let out = Path::new("/tmp/model");
        assert_eq!(model_file_in(out, SaveMode::Binary), out.join("outputmodel.bin"));
        assert_eq!(model_file_in(out, SaveMode::Text), out.join("outputmodel.txt"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("outputmodel.txt");
        save_params(&[0.5], &path, SaveMode::Text).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("params.bin");
        assert!(matches!(
            BinaryParamWriter.write_params(&[1.0], &path).unwrap_err(),
            TrainError::Write { .. }
        ));
    }
}
