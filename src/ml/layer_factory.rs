// ============================================================
// Layer 5 — Layer Factory
// ============================================================
// Resolves the `layerType` of a single-layer architecture to the
// layer that gets built and fit on features alone. Only layers
// that learn without labels can be built here; supervised kinds
// belong in a multi-layer architecture.

use burn::prelude::*;

use crate::domain::architecture::{LayerConf, LayerKind};
use crate::domain::error::{Result, TrainError};
use crate::ml::model::AutoEncoder;

/// A single layer that can be fit without labels.
#[derive(Debug)]
pub enum PretrainLayer<B: Backend> {
    AutoEncoder(AutoEncoder<B>),
}

impl<B: Backend> PretrainLayer<B> {
    /// The layer's parameters flattened in its own fixed order.
    pub fn params(&self) -> Result<Vec<f32>> {
        match self {
            PretrainLayer::AutoEncoder(layer) => layer.params(),
        }
    }
}

/// Build the pretrainable layer `conf.layer_type` names, sized
/// `nIn → nOut` and initialised on `device`.
///
/// `dense` and `output` layers need labels and cannot be fit alone, so
/// they are rejected with `UnsupportedLayer` rather than built.
pub fn create_layer<B: Backend>(conf: &LayerConf, device: &B::Device) -> Result<PretrainLayer<B>> {
    match conf.layer_type {
        LayerKind::AutoEncoder => {
            tracing::debug!("Building autoencoder {} → {}", conf.n_in, conf.n_out);
            Ok(PretrainLayer::AutoEncoder(AutoEncoder::new(conf, device)))
        }
        kind @ (LayerKind::Dense | LayerKind::Output) => {
            Err(TrainError::UnsupportedLayer(kind.name().to_string()))
        }
    }
}
