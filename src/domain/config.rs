// ============================================================
// Layer 3 — Training Configuration
// ============================================================
// The resolved view of the properties file. Built exactly once by
// infra::config_loader and passed by reference afterwards; nothing
// re-reads the file lazily.
//
// Recognised keys and their fallbacks:
//   dl4j.execution.runtime  → "local"
//   dl4j.output.directory   → "/tmp/dl4_model_default.model"
//   dl4j.input.directory    → required, no fallback
//   dl4j.input.format       → SVMLight input format
//   dl4j.model.config       → empty path (validation then fails)

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub const EXECUTION_RUNTIME_MODE_KEY: &str = "dl4j.execution.runtime";
pub const EXECUTION_RUNTIME_MODE_DEFAULT: &str = "local";

pub const OUTPUT_DIRECTORY_KEY: &str = "dl4j.output.directory";
pub const OUTPUT_DIRECTORY_DEFAULT: &str = "/tmp/dl4_model_default.model";

pub const INPUT_DATA_KEY: &str = "dl4j.input.directory";

pub const INPUT_FORMAT_KEY: &str = "dl4j.input.format";
pub const DEFAULT_INPUT_FORMAT: &str = "org.canova.api.formats.input.impl.SVMLightInputFormat";

pub const MODEL_CONFIG_KEY: &str = "dl4j.model.config";

/// First line of the verbose configuration dump.
pub const DEBUG_DUMP_HEADER: &str =
    "DL4J: Deep Learning Engine Command-Line Interface > Debug Print Conf ----";

/// Fully resolved training configuration.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Raw runtime string as written in the file (or the default)
    pub runtime:           String,
    pub output_directory:  PathBuf,
    pub input_path:        PathBuf,
    pub input_format:      String,
    /// Empty when the key was absent
    pub model_config_path: PathBuf,
    /// Every property from the file, kept for the verbose dump
    pub properties:        BTreeMap<String, String>,
}

impl TrainingConfig {
    /// Build a configuration from parsed properties, applying fallbacks.
    pub fn from_properties(
        properties: BTreeMap<String, String>,
    ) -> crate::domain::error::Result<Self> {
        use crate::domain::error::TrainError;

        let runtime = properties
            .get(EXECUTION_RUNTIME_MODE_KEY)
            .cloned()
            .unwrap_or_else(|| EXECUTION_RUNTIME_MODE_DEFAULT.to_string());

        let output_directory = properties
            .get(OUTPUT_DIRECTORY_KEY)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(OUTPUT_DIRECTORY_DEFAULT));

        let input_path = properties
            .get(INPUT_DATA_KEY)
            .map(PathBuf::from)
            .ok_or(TrainError::MissingInputPath { key: INPUT_DATA_KEY })?;

        let input_format = properties
            .get(INPUT_FORMAT_KEY)
            .cloned()
            .unwrap_or_else(|| DEFAULT_INPUT_FORMAT.to_string());

        // Cold start: no architecture given. Proceed with an empty path and
        // let validation reject it rather than inventing an architecture.
        let model_config_path = match properties.get(MODEL_CONFIG_KEY) {
            Some(path) => PathBuf::from(path),
            None => {
                tracing::warn!(
                    "No model was defined ('{}' is not set), default parameters being used. \
                     Training will be sub-optimal.",
                    MODEL_CONFIG_KEY
                );
                PathBuf::new()
            }
        };

        Ok(Self {
            runtime,
            output_directory,
            input_path,
            input_format,
            model_config_path,
            properties,
        })
    }

    /// The runtime this configuration dispatches to.
    pub fn runtime_mode(&self) -> RuntimeMode {
        RuntimeMode::parse(&self.runtime)
    }

    /// Render the loaded properties, one `key -- value` per line, under
    /// the banner verbose runs have always printed.
    ///
    /// Keys come out sorted because `properties` is a `BTreeMap`.
    pub fn debug_dump(&self) -> String {
        let mut out = String::from(DEBUG_DUMP_HEADER);
        out.push('\n');
        out.push_str("-----------------------------\n");
        for (key, value) in &self.properties {
            out.push_str(&format!("{key} -- {value}\n"));
        }
        out.push_str("-----------------------------\n");
        out
    }
}

/// Where training runs. Closed set: only `Local` does any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Local,
    Hadoop,
    Spark,
}

impl RuntimeMode {
    /// Case-insensitive and whitespace-tolerant; unknown values run locally.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "hadoop" => RuntimeMode::Hadoop,
            "spark"  => RuntimeMode::Spark,
            _        => RuntimeMode::Local,
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeMode::Local  => "local",
            RuntimeMode::Hadoop => "hadoop",
            RuntimeMode::Spark  => "spark",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Multi,
    Single,
}

impl NetworkType {
    /// "multi" selects the multi-layer branch; any other value is a single layer.
    pub fn from_flag(raw: &str) -> Self {
        if raw == "multi" { NetworkType::Multi } else { NetworkType::Single }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Binary,
    Text,
}

impl SaveMode {
    /// Only the exact string "binary" selects binary output.
    pub fn from_flag(raw: &str) -> Self {
        if raw == "binary" { SaveMode::Binary } else { SaveMode::Text }
    }
}

/// Per-run switches that come from the command line rather than the file.
#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub network_type: NetworkType,
    pub save_mode:    SaveMode,
    pub verbose:      bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            network_type: NetworkType::Multi,
            save_mode:    SaveMode::Text,
            verbose:      false,
        }
    }
}
