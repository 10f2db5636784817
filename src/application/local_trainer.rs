// ============================================================
// Layer 2 — Local Trainer
// ============================================================
// The only execution path that does real work:
//
//   Step 1: Resolve the input format          (Layer 4 - data)
//   Step 2: Split the input path into files   (Layer 4 - data)
//   Step 3: Parse the architecture JSON       (Layer 6 - infra)
//   Step 4: Build reader + data-set iterator  (Layer 4 - data)
//   Step 5: Build the network, one fit pass   (Layer 5 - ml)
//   Step 6: Write the parameter vector        (Layer 6 - infra)
//
// Output location differs by branch: the multi-layer branch writes
// outputmodel.{bin,txt} inside the output directory, the single-layer
// branch writes to the output directory path itself.

use std::path::PathBuf;

use crate::data::{
    input_format::InputFormatRegistry,
    iterator::RecordReaderDataSetIterator,
    split::FileSplit,
};
use crate::domain::config::{NetworkType, SaveMode, TrainOptions, TrainingConfig};
use crate::domain::error::Result;
use crate::domain::traits::IterationListener;
use crate::infra::{model_config, param_writer};
use crate::ml::{
    listener::ScoreIterationListener,
    trainer::{fit_multi_layer, fit_single_layer, train_device, FitSummary, TrainBackend},
};

/// What a completed local run produced.
///
/// `artifact` is the exact file written, which differs by network type
/// (see the module header).
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub network_type: NetworkType,
    pub save_mode:    SaveMode,
    pub artifact:     PathBuf,
    pub num_params:   usize,
    pub summary:      FitSummary,
}

pub struct LocalTrainer<'a> {
    config:   &'a TrainingConfig,
    options:  TrainOptions,
    registry: InputFormatRegistry,
}

impl<'a> LocalTrainer<'a> {
    pub fn new(config: &'a TrainingConfig, options: TrainOptions) -> Self {
        Self { config, options, registry: InputFormatRegistry::builtin() }
    }

    /// Run the local pipeline end to end.
    ///
    /// Every error is returned to the caller; an unknown input format is
    /// the only one raised before any file is touched.
    pub fn run(&self) -> Result<TrainingReport> {
        let cfg = self.config;
        tracing::info!("Executing local training from '{}'", cfg.input_path.display());

        // ── Step 1–2: input format and split ──────────────────────────────────
        let format = self.registry.resolve(&cfg.input_format)?;
        let split  = FileSplit::new(&cfg.input_path)?;
        tracing::info!(
            "Input format '{}' over {} file(s) under '{}'",
            format.name(),
            split.files().len(),
            split.root().display()
        );

        match self.options.network_type {
            NetworkType::Multi => {
                // ── Step 3: architecture ──────────────────────────────────────
                let arch = model_config::load_multi_layer(&cfg.model_config_path)?;
                let first = &arch.confs[0];
                let last  = &arch.confs[arch.confs.len() - 1];

                // ── Step 4: batches sized by the first layer, labels by the last
                let reader = format.create_reader(split.files(), first.n_in)?;
                let iter   = RecordReaderDataSetIterator::<TrainBackend>::new(
                    reader,
                    first.batch_size,
                    last.n_out,
                    train_device(),
                );
                tracing::debug!("Batch size {}, {} labels", iter.batch_size(), last.n_out);

                // ── Step 5: one fit pass ──────────────────────────────────────
                let mut listeners: Vec<Box<dyn IterationListener>> = Vec::new();
                if self.options.verbose {
                    listeners.push(Box::new(ScoreIterationListener::new(1)));
                }
                let trained = fit_multi_layer(&arch, iter, &mut listeners)?;

                // ── Step 6: save ──────────────────────────────────────────────
                let artifact = param_writer::model_file_in(&cfg.output_directory, self.options.save_mode);
                param_writer::save_params(&trained.params, &artifact, self.options.save_mode)?;

                Ok(self.report(artifact, trained.params.len(), trained.summary))
            }
            NetworkType::Single => {
                let conf   = model_config::load_single_layer(&cfg.model_config_path)?;
                let reader = format.create_reader(split.files(), conf.n_in)?;
                let iter   = RecordReaderDataSetIterator::<TrainBackend>::unlabeled(
                    reader,
                    conf.batch_size,
                    train_device(),
                );

                let trained = fit_single_layer(&conf, iter)?;

                let artifact = cfg.output_directory.clone();
                param_writer::save_params(&trained.params, &artifact, self.options.save_mode)?;

                Ok(self.report(artifact, trained.params.len(), trained.summary))
            }
        }
    }

    fn report(&self, artifact: PathBuf, num_params: usize, summary: FitSummary) -> TrainingReport {
        TrainingReport {
            network_type: self.options.network_type,
            save_mode:    self.options.save_mode,
            artifact,
            num_params,
            summary,
        }
    }
}
