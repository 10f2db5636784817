// ============================================================
// Layer 3 — Training Errors
// ============================================================
// One structured error type shared by every layer below the CLI.
// The CLI decides which variants abort the process and which are
// only reported (see cli/mod.rs).
//
// Reference: thiserror crate documentation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainError {
    /// The properties file could not be opened or parsed
    #[error("cannot read training configuration '{path}': {message}")]
    ConfigRead { path: PathBuf, message: String },

    /// `dl4j.input.directory` is absent — there is nothing to train on
    #[error("no input file to train on: '{key}' is not set")]
    MissingInputPath { key: &'static str },

    #[error("unknown input format '{0}'")]
    UnknownInputFormat(String),

    #[error("cannot read input '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record at {path}:{line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("record label {label} is not a valid class for {num_labels} labels")]
    LabelOutOfRange { label: f64, num_labels: usize },

    #[error("record has no label but {num_labels} labels were requested")]
    MissingLabel { num_labels: usize },

    #[error("cannot parse model architecture '{path}': {message}")]
    Architecture { path: PathBuf, message: String },

    #[error("multi-layer architecture contains no layers")]
    EmptyArchitecture,

    #[error("layer {index} expects {expected} inputs but the previous layer produces {found}")]
    LayerWidthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Classification loss on an output layer too narrow to hold classes
    #[error("loss '{loss}' needs at least two output labels, the output layer has {num_labels}")]
    IncompatibleLoss { loss: &'static str, num_labels: usize },

    #[error("layer type '{0}' cannot be fit without labels as a single layer")]
    UnsupportedLayer(String),

    #[error("tensor data error: {0}")]
    Tensor(String),

    #[error("cannot write parameters to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrainError {
    /// Errors raised before any training work starts. These abort the
    /// run; everything else happens inside the local trainer.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(
            self,
            TrainError::ConfigRead { .. }
                | TrainError::MissingInputPath { .. }
                | TrainError::UnknownInputFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors_are_fatal() {
        assert!(TrainError::MissingInputPath { key: "dl4j.input.directory" }.is_fatal_setup());
        assert!(TrainError::UnknownInputFormat("x".into()).is_fatal_setup());
        assert!(!TrainError::EmptyArchitecture.is_fatal_setup());
    }
}
