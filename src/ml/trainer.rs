// ============================================================
// Layer 5 — Fit Passes
// ============================================================
// One fit pass = one traversal of the data-set iterator. For every
// batch the optimizer takes `numIterations` steps; listeners see
// the loss after each step.
//
//   multi-layer  → supervised, loss from the last layer's lossFunction
//   single layer → unsupervised reconstruction of the features
//
// Both paths share `fit_pass`, which is generic over the burn
// module and the optimizer, so SGD and Adam run the same loop.
//
// Reference: Burn Book §5 (Custom Training Loop)

use burn::{
    backend::{Autodiff, NdArray},
    module::AutodiffModule,
    nn::loss::{CrossEntropyLossConfig, MseLoss, Reduction},
    optim::{AdamConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::iterator::DataSetBatch;
use crate::domain::architecture::{Activation, LayerConf, LossFunction, MultiLayerConf, OptimizerKind};
use crate::domain::error::{Result, TrainError};
use crate::domain::traits::IterationListener;
use crate::ml::layer_factory::{create_layer, PretrainLayer};
use crate::ml::model::{AutoEncoder, Mlp, MultiLayerNetwork};

pub type TrainBackend = Autodiff<NdArray>;

/// Device every training tensor lives on. Batches must be built here too.
pub fn train_device() -> <TrainBackend as Backend>::Device {
    Default::default()
}

/// Counters for one fit pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitSummary {
    pub batches:    usize,
    pub examples:   usize,
    pub iterations: usize,
    pub last_score: Option<f64>,
}

/// The flattened parameters of a fitted model plus how it got there.
#[derive(Debug, Clone)]
pub struct TrainedParams {
    pub params:  Vec<f32>,
    pub summary: FitSummary,
}

#[derive(Debug, Clone, Copy)]
struct FitSettings {
    optimizer:       OptimizerKind,
    learning_rate:   f64,
    steps_per_batch: usize,
}

impl From<&LayerConf> for FitSettings {
    fn from(conf: &LayerConf) -> Self {
        Self {
            optimizer:       conf.optimizer,
            learning_rate:   conf.learning_rate,
            steps_per_batch: conf.num_iterations.max(1),
        }
    }
}

// ─── Multi-layer ──────────────────────────────────────────────────────────────

/// Build a network from `conf` and run exactly one fit pass over `batches`.
///
/// The optimizer, learning rate and steps per batch come from the first
/// layer; the loss comes from the last. Every listener sees every step.
/// Returns the fitted parameters flattened layer by layer, weight then bias.
pub fn fit_multi_layer<I>(
    conf:      &MultiLayerConf,
    batches:   I,
    listeners: &mut [Box<dyn IterationListener>],
) -> Result<TrainedParams>
where
    I: Iterator<Item = Result<DataSetBatch<TrainBackend>>>,
{
    let device = train_device();
    if let Some(seed) = conf.seed() {
        TrainBackend::seed(seed);
    }

    let network = MultiLayerNetwork::<TrainBackend>::new(conf, &device)?;
    let first   = conf.first().ok_or(TrainError::EmptyArchitecture)?;
    let last    = conf.last().ok_or(TrainError::EmptyArchitecture)?;
    tracing::info!(
        "Multi-layer network: {} layers, {} parameters",
        conf.confs.len(),
        network.num_params()
    );

    let activations = network.activations.clone();
    let loss_fn     = last.loss_function;
    let num_labels  = last.n_out;

    let (model, summary) = fit_with_optimizer::<TrainBackend, _, _, _>(
        FitSettings::from(first),
        network.model,
        batches,
        listeners,
        |model: &Mlp<TrainBackend>, batch| supervised_loss(model, &activations, loss_fn, num_labels, batch),
    )?;

    let fitted = MultiLayerNetwork { model, activations: network.activations };
    Ok(TrainedParams { params: fitted.params()?, summary })
}

// ─── Single layer ─────────────────────────────────────────────────────────────

/// Build the layer `conf` names and fit it on each batch's features.
///
/// Labels are ignored: the layer learns to reconstruct its (corrupted)
/// input. No listeners are attached on this path.
pub fn fit_single_layer<I>(conf: &LayerConf, batches: I) -> Result<TrainedParams>
where
    I: Iterator<Item = Result<DataSetBatch<TrainBackend>>>,
{
    let device = train_device();
    if let Some(seed) = conf.seed {
        TrainBackend::seed(seed);
    }

    let activation = conf.activation;
    let corruption = conf.corruption_level;

    match create_layer::<TrainBackend>(conf, &device)? {
        PretrainLayer::AutoEncoder(layer) => {
            let (layer, summary) = fit_with_optimizer::<TrainBackend, _, _, _>(
                FitSettings::from(conf),
                layer,
                batches,
                &mut [],
                |layer: &AutoEncoder<TrainBackend>, batch: &DataSetBatch<TrainBackend>| {
                    let x     = batch.features.clone();
                    let recon = layer.reconstruct(activation, x.clone(), corruption);
                    Ok(MseLoss::new().forward(recon, x, Reduction::Mean))
                },
            )?;
            let fitted = PretrainLayer::AutoEncoder(layer);
            Ok(TrainedParams { params: fitted.params()?, summary })
        }
    }
}

/// Loss of `model` on one labelled batch.
///
///   mse    → mean squared error of the activated output against the
///            float targets (one-hot or regression)
///   mcxent → burn's cross-entropy on the raw logits against the class
///            indices; it applies log-softmax itself
fn supervised_loss<B: Backend>(
    model:       &Mlp<B>,
    activations: &[Activation],
    loss:        LossFunction,
    num_labels:  usize,
    batch:       &DataSetBatch<B>,
) -> Result<Tensor<B, 1>> {
    let x = batch.features.clone();
    match loss {
        LossFunction::Mse => {
            let targets = batch
                .targets
                .clone()
                .ok_or(TrainError::MissingLabel { num_labels })?;
            Ok(MseLoss::new().forward(model.forward(activations, x), targets, Reduction::Mean))
        }
        LossFunction::Mcxent => {
            let classes = match (&batch.classes, &batch.targets) {
                (Some(classes), _) => classes.clone(),
                (None, Some(_)) => {
                    return Err(TrainError::IncompatibleLoss { loss: "mcxent", num_labels })
                }
                (None, None) => return Err(TrainError::MissingLabel { num_labels }),
            };
            let ce = CrossEntropyLossConfig::new().init::<B>(&x.device());
            Ok(ce.forward(model.logits(activations, x), classes))
        }
    }
}

// ─── Shared loop ──────────────────────────────────────────────────────────────

fn fit_with_optimizer<B, M, I, L>(
    settings:  FitSettings,
    model:     M,
    batches:   I,
    listeners: &mut [Box<dyn IterationListener>],
    loss_fn:   L,
) -> Result<(M, FitSummary)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    I: Iterator<Item = Result<DataSetBatch<B>>>,
    L: Fn(&M, &DataSetBatch<B>) -> Result<Tensor<B, 1>>,
{
    match settings.optimizer {
        OptimizerKind::Sgd => {
            let optim = SgdConfig::new().init::<B, M>();
            fit_pass(settings, model, optim, batches, listeners, loss_fn)
        }
        OptimizerKind::Adam => {
            let optim = AdamConfig::new().init::<B, M>();
            fit_pass(settings, model, optim, batches, listeners, loss_fn)
        }
    }
}

fn fit_pass<B, M, O, I, L>(
    settings:  FitSettings,
    mut model: M,
    mut optim: O,
    batches:   I,
    listeners: &mut [Box<dyn IterationListener>],
    loss_fn:   L,
) -> Result<(M, FitSummary)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    O: Optimizer<M, B>,
    I: Iterator<Item = Result<DataSetBatch<B>>>,
    L: Fn(&M, &DataSetBatch<B>) -> Result<Tensor<B, 1>>,
{
    let mut summary = FitSummary::default();

    for batch in batches {
        let batch = batch?;

        for _ in 0..settings.steps_per_batch {
            let loss  = loss_fn(&model, &batch)?;
            let score = loss.clone().into_scalar().elem::<f64>();

            // Backward pass + optimizer update
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(settings.learning_rate, model, grads);

            summary.iterations += 1;
            summary.last_score  = Some(score);
            for listener in listeners.iter_mut() {
                listener.iteration_done(summary.iterations, score);
            }
        }

        summary.batches  += 1;
        summary.examples += batch.rows;
    }

    if summary.batches == 0 {
        tracing::warn!("Input produced no records; parameters stay at their initial values");
    } else {
        tracing::info!(
            "Fit pass done: {} batches, {} examples, {} iterations, final score {:.6}",
            summary.batches,
            summary.examples,
            summary.iterations,
            summary.last_score.unwrap_or(f64::NAN)
        );
    }
    Ok((model, summary))
}
