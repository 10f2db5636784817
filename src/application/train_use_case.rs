// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one `train` invocation:
//
//   Step 1: Validate the architecture JSON     (Layer 6 - infra)
//   Step 2: Dispatch on the runtime mode
//             hadoop → not supported, skip
//             spark  → not supported, skip
//             other  → LocalTrainer
//
// The configuration is loaded once by the caller and owned here;
// nothing below re-reads the properties file.

use std::path::{Path, PathBuf};

use crate::application::local_trainer::{LocalTrainer, TrainingReport};
use crate::domain::config::{RuntimeMode, TrainOptions, TrainingConfig};
use crate::domain::error::Result;
use crate::infra::{config_loader, model_config};

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone)]
pub enum TrainOutcome {
    /// Local training ran and parameters were written
    Trained(TrainingReport),

    /// The architecture file is missing or not valid JSON for either schema
    InvalidArchitecture { path: PathBuf },

    /// A distributed runtime was requested; nothing was trained
    RuntimeUnsupported(RuntimeMode),
}

/// One `train` invocation: a loaded configuration plus the
/// command-line switches the file does not cover.
pub struct TrainUseCase {
    config:  TrainingConfig,
    options: TrainOptions,
}

impl TrainUseCase {
    pub fn new(config: TrainingConfig, options: TrainOptions) -> Self {
        Self { config, options }
    }

    /// Load the properties file at `path` and build the use case from it.
    pub fn from_config_file(path: impl AsRef<Path>, options: TrainOptions) -> Result<Self> {
        let config = config_loader::load_config_file(path)?;
        Ok(Self::new(config, options))
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Validate, dispatch and (for the local runtime) train.
    ///
    /// An invalid architecture or a distributed runtime is a normal
    /// outcome, not an error. Errors come only from the local trainer.
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: architecture must be valid before anything runs ───────────
        if !model_config::validate_existing_json_config_file(&cfg.model_config_path) {
            return Ok(TrainOutcome::InvalidArchitecture {
                path: cfg.model_config_path.clone(),
            });
        }
        tracing::info!("JSON model architecture is validated");

        // ── Step 2: dispatch ──────────────────────────────────────────────────
        match cfg.runtime_mode() {
            mode @ (RuntimeMode::Hadoop | RuntimeMode::Spark) => {
                tracing::warn!("Execution on {} from CLI not yet supported", mode);
                Ok(TrainOutcome::RuntimeUnsupported(mode))
            }
            RuntimeMode::Local => {
                LocalTrainer::new(cfg, self.options).run().map(TrainOutcome::Trained)
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{NetworkType, SaveMode};
    use crate::domain::error::TrainError;
    use crate::infra::param_writer::read_binary_params;
    use std::fs;
    use tempfile::TempDir;

    const MULTI_ARCH: &str = r#"{
        "seed": 42,
        "confs": [
            {"layerType": "dense",  "nIn": 4, "nOut": 5, "batchSize": 32, "activation": "tanh"},
            {"layerType": "output", "nIn": 5, "nOut": 3, "activation": "softmax",
             "lossFunction": "mcxent"}
        ]
    }"#;

    const SINGLE_ARCH: &str = r#"{"layerType": "autoEncoder", "nIn": 4, "nOut": 2, "batchSize": 3}"#;

    /// Three-class SVMLight data, four features.
    fn svm_data() -> String {
        (0..40)
            .map(|i| {
                let class = i % 3;
                format!("{class} 1:{:.2} 2:{:.2} 4:{:.2}\n", class as f32 * 0.5, 0.1 * (i % 5) as f32, 1.0)
            })
            .collect()
    }

    struct Fixture {
        dir:  TempDir,
        conf: PathBuf,
        out:  PathBuf,
    }

    fn fixture(runtime: Option<&str>, arch: Option<&str>) -> Fixture {
        let dir  = tempfile::tempdir().unwrap();
        let data = dir.path().join("in.svm");
        let out  = dir.path().join("model_out");
        fs::write(&data, svm_data()).unwrap();

        let mut body = format!(
            "dl4j.input.directory={}\ndl4j.output.directory={}\n",
            data.display(),
            out.display()
        );
        if let Some(runtime) = runtime {
            body.push_str(&format!("dl4j.execution.runtime={runtime}\n"));
        }
        if let Some(arch) = arch {
            let arch_path = dir.path().join("arch.json");
            fs::write(&arch_path, arch).unwrap();
            body.push_str(&format!("dl4j.model.config={}\n", arch_path.display()));
        }

        let conf = dir.path().join("train.conf");
        fs::write(&conf, body).unwrap();
        Fixture { dir, conf, out }
    }

    fn options(network_type: NetworkType, save_mode: SaveMode) -> TrainOptions {
        TrainOptions { network_type, save_mode, verbose: true }
    }

    fn run(fx: &Fixture, opts: TrainOptions) -> Result<TrainOutcome> {
        TrainUseCase::from_config_file(&fx.conf, opts)?.execute()
    }

    #[test]
    fn test_multi_layer_text_output() {
        let fx      = fixture(Some("local"), Some(MULTI_ARCH));
        let outcome = run(&fx, options(NetworkType::Multi, SaveMode::Text)).unwrap();

        let TrainOutcome::Trained(report) = outcome else {
            panic!("expected a trained outcome");
        };
        assert_eq!(report.artifact, fx.out.join("outputmodel.txt"));
        // 40 records in batches of 32
        assert_eq!(report.summary.batches, 2);
        assert_eq!(report.summary.examples, 40);

        let text   = fs::read_to_string(&report.artifact).unwrap();
        let values: Vec<f32> = text.trim().split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(values.len(), 4 * 5 + 5 + 5 * 3 + 3);
        assert_eq!(values.len(), report.num_params);
        assert!(!fx.out.join("outputmodel.bin").exists());
    }

    #[test]
    fn test_multi_layer_binary_output() {
        let fx      = fixture(None, Some(MULTI_ARCH));
        let outcome = run(&fx, options(NetworkType::Multi, SaveMode::Binary)).unwrap();

        let TrainOutcome::Trained(report) = outcome else {
            panic!("expected a trained outcome");
        };
        assert_eq!(report.artifact, fx.out.join("outputmodel.bin"));
        assert_eq!(read_binary_params(&report.artifact).unwrap().len(), report.num_params);
        assert!(!fx.out.join("outputmodel.txt").exists());
    }

    #[test]
    fn test_single_layer_writes_to_output_path_directly() {
        let fx      = fixture(None, Some(SINGLE_ARCH));
        let outcome = run(&fx, options(NetworkType::Single, SaveMode::Text)).unwrap();

        let TrainOutcome::Trained(report) = outcome else {
            panic!("expected a trained outcome");
        };
        assert_eq!(report.artifact, fx.out);
        assert!(fx.out.is_file());
        let text = fs::read_to_string(&fx.out).unwrap();
        assert_eq!(text.trim().split(',').count(), 4 * 2 + 2 + 4);
    }

    #[test]
    fn test_invalid_json_never_trains() {
        let fx      = fixture(None, Some("{ not json"));
        let outcome = run(&fx, options(NetworkType::Multi, SaveMode::Text)).unwrap();

        assert!(matches!(outcome, TrainOutcome::InvalidArchitecture { .. }));
        assert!(!fx.out.exists());
    }

    #[test]
    fn test_missing_model_config_key_is_invalid() {
        let fx      = fixture(None, None);
        let outcome = run(&fx, TrainOptions::default()).unwrap();
        match outcome {
            TrainOutcome::InvalidArchitecture { path } => assert_eq!(path, PathBuf::new()),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_hadoop_and_spark_skip_training() {
        for runtime in ["HADOOP", "  hadoop ", "Spark"] {
            let fx      = fixture(Some(runtime), Some(MULTI_ARCH));
            let outcome = run(&fx, TrainOptions::default()).unwrap();
            assert!(matches!(outcome, TrainOutcome::RuntimeUnsupported(_)), "{runtime}");
            assert!(!fx.out.exists());
        }
    }

    #[test]
    fn test_missing_input_key_aborts_before_training() {
        let dir  = tempfile::tempdir().unwrap();
        let conf = dir.path().join("train.conf");
        fs::write(&conf, "dl4j.output.directory=/tmp/never\n").unwrap();

        let err = TrainUseCase::from_config_file(&conf, TrainOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, TrainError::MissingInputPath { .. }));
        assert!(err.is_fatal_setup());
    }

    #[test]
    fn test_unknown_input_format_is_fatal() {
        let fx = fixture(None, Some(MULTI_ARCH));
        let mut body = fs::read_to_string(&fx.conf).unwrap();
        body.push_str("dl4j.input.format=com.example.ParquetInputFormat\n");
        fs::write(&fx.conf, body).unwrap();

        let err = run(&fx, TrainOptions::default()).unwrap_err();
        assert!(matches!(err, TrainError::UnknownInputFormat(_)));
        assert!(err.is_fatal_setup());
    }

    #[test]
    fn test_write_failure_is_a_distinct_error() {
        let fx = fixture(None, Some(MULTI_ARCH));
        // A plain file where the output directory should be
        fs::write(&fx.out, "occupied").unwrap();

        let err = run(&fx, options(NetworkType::Multi, SaveMode::Text)).unwrap_err();
        assert!(matches!(err, TrainError::Write { .. }));
        assert!(!err.is_fatal_setup());
        drop(fx.dir);
    }
}
