// ============================================================
// Layer 6 — Training Configuration Loader
// ============================================================
// Reads a Java-style .properties file and resolves it into a
// TrainingConfig. A file that cannot be opened or parsed is an
// error: no defaults are applied on top of a failed read.
//
// Example file:
//   dl4j.input.directory=/data/iris.svm
//   dl4j.model.config=/cfg/iris.json
//   dl4j.output.directory=/tmp/iris_model
//
// Reference: java-properties crate documentation

use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::Path,
};

use crate::domain::config::TrainingConfig;
use crate::domain::error::{Result, TrainError};

/// Load and resolve the training configuration at `path`.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<TrainingConfig> {
    let path = path.as_ref();
    let properties = read_properties(path)?;
    tracing::debug!("Loaded {} properties from '{}'", properties.len(), path.display());
    TrainingConfig::from_properties(properties)
}

/// Parse a properties file into a sorted map.
///
/// Java `.properties` rules apply: `=`, `:` or whitespace separators,
/// `#`/`!` comments, backslash escapes and line continuations. A later
/// duplicate key replaces an earlier one.
pub fn read_properties(path: &Path) -> Result<BTreeMap<String, String>> {
    let read_error = |message: String| TrainError::ConfigRead {
        path: path.to_path_buf(),
        message,
    };

    // The file handle lives only for this scope and is closed on every path
    let file = File::open(path).map_err(|e| read_error(e.to_string()))?;
    let parsed = java_properties::read(BufReader::new(file))
        .map_err(|e| read_error(e.to_string()))?;

    Ok(parsed.into_iter().collect())
}
