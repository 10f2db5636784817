// ============================================================
// Layer 3 — Model Architecture Description
// ============================================================
// The JSON schema for network architectures. Two shapes exist:
//
//   single layer:  { "layerType": "autoEncoder", "nIn": 4, "nOut": 3, ... }
//   multi layer:   { "confs": [ {layer}, {layer}, ... ], "seed": 42 }
//
// These are plain serde types; nothing here knows about burn.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    Dense,
    Output,
    AutoEncoder,
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Dense       => "dense",
            LayerKind::Output      => "output",
            LayerKind::AutoEncoder => "autoEncoder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Activation {
    Identity,
    #[default]
    Sigmoid,
    Tanh,
    Relu,
    Softmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptimizerKind {
    #[default]
    Sgd,
    Adam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LossFunction {
    #[default]
    Mse,
    /// Softmax cross-entropy over the output logits
    #[serde(alias = "negativeLogLikelihood")]
    Mcxent,
}

/// Hyperparameters of one layer (DL4J's `NeuralNetConfiguration`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConf {
    pub layer_type: LayerKind,
    pub n_in:  usize,
    pub n_out: usize,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Optimizer steps taken per mini-batch
    #[serde(default = "default_num_iterations")]
    pub num_iterations: usize,
    #[serde(default)]
    pub optimizer: OptimizerKind,
    #[serde(default)]
    pub loss_function: LossFunction,
    /// Fraction of inputs zeroed before reconstruction (autoencoders only)
    #[serde(default)]
    pub corruption_level: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_batch_size() -> usize { 10 }
fn default_learning_rate() -> f64 { 0.1 }
fn default_num_iterations() -> usize { 1 }

/// A stack of layers (DL4J's `MultiLayerConfiguration`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiLayerConf {
    pub confs: Vec<LayerConf>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MultiLayerConf {
    pub fn first(&self) -> Option<&LayerConf> {
        self.confs.first()
    }

    pub fn last(&self) -> Option<&LayerConf> {
        self.confs.last()
    }

    /// Top-level seed wins over the first layer's.
    pub fn seed(&self) -> Option<u64> {
        self.seed.or_else(|| self.first().and_then(|c| c.seed))
    }
}

/// Either architecture shape. Multi is tried first because it is the
/// only one with a `confs` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Architecture {
    Multi(MultiLayerConf),
    Single(LayerConf),
}
