use burn::{
    module::Param,
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{activation, Distribution},
};

use crate::domain::architecture::{Activation, LayerConf, MultiLayerConf};
use crate::domain::error::{Result, TrainError};

/// Apply an element-wise activation. Softmax runs across each row.
pub fn activate<B: Backend>(act: Activation, x: Tensor<B, 2>) -> Tensor<B, 2> {
    match act {
        Activation::Identity => x,
        Activation::Sigmoid  => activation::sigmoid(x),
        Activation::Tanh     => activation::tanh(x),
        Activation::Relu     => activation::relu(x),
        Activation::Softmax  => activation::softmax(x, 1),
    }
}

fn flatten<B: Backend, const D: usize>(tensor: Tensor<B, D>, out: &mut Vec<f32>) -> Result<()> {
    let values = tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| TrainError::Tensor(format!("{e:?}")))?;
    out.extend(values);
    Ok(())
}

fn linear_params<B: Backend>(linear: &Linear<B>, out: &mut Vec<f32>) -> Result<()> {
    flatten(linear.weight.val(), out)?;
    if let Some(bias) = &linear.bias {
        flatten(bias.val(), out)?;
    }
    Ok(())
}

// ─── Multi-layer network ──────────────────────────────────────────────────────

/// The trainable part of a multi-layer network: one `Linear` per layer.
#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    pub layers: Vec<Linear<B>>,
}

/// A feed-forward stack built from a `MultiLayerConf`. Activations live
/// beside the burn module because they carry no parameters.
#[derive(Debug)]
pub struct MultiLayerNetwork<B: Backend> {
    pub model:       Mlp<B>,
    pub activations: Vec<Activation>,
}

impl<B: Backend> MultiLayerNetwork<B> {
    /// Build every layer of `conf` on `device`.
    ///
    /// Fails with `EmptyArchitecture` for an empty stack and with
    /// `LayerWidthMismatch` when a layer's `nIn` is not the previous
    /// layer's `nOut`. Initial weights come from burn's default
    /// initializer, so they depend on the backend seed.
    pub fn new(conf: &MultiLayerConf, device: &B::Device) -> Result<Self> {
        if conf.confs.is_empty() {
            return Err(TrainError::EmptyArchitecture);
        }
        for (index, pair) in conf.confs.windows(2).enumerate() {
            if pair[1].n_in != pair[0].n_out {
                return Err(TrainError::LayerWidthMismatch {
                    index:    index + 1,
                    expected: pair[1].n_in,
                    found:    pair[0].n_out,
                });
            }
        }

        let layers = conf
            .confs
            .iter()
            .map(|c| LinearConfig::new(c.n_in, c.n_out).init(device))
            .collect();
        let activations = conf.confs.iter().map(|c| c.activation).collect();

        Ok(Self { model: Mlp { layers }, activations })
    }

    pub fn num_params(&self) -> usize {
        self.model.num_params()
    }

    /// Flattened parameters: each layer's weight `[nIn × nOut]` then its bias.
    pub fn params(&self) -> Result<Vec<f32>> {
        let mut out = Vec::with_capacity(self.num_params());
        for layer in &self.model.layers {
            linear_params(layer, &mut out)?;
        }
        Ok(out)
    }
}

impl<B: Backend> Mlp<B> {
    /// Run every layer, leaving the last one's activation unapplied.
    pub fn logits(&self, activations: &[Activation], mut x: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.layers.len().saturating_sub(1);
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(x);
            if i < last {
                x = activate(activations[i], x);
            }
        }
        x
    }

    /// Full forward pass including the output activation.
    pub fn forward(&self, activations: &[Activation], x: Tensor<B, 2>) -> Tensor<B, 2> {
        let out_act = activations.last().copied().unwrap_or(Activation::Identity);
        activate(out_act, self.logits(activations, x))
    }
}

// ─── Single-layer autoencoder ─────────────────────────────────────────────────

/// Tied-weight autoencoder: the decoder reuses the encoder weight transposed
/// and only adds a visible bias.
#[derive(Module, Debug)]
pub struct AutoEncoder<B: Backend> {
    pub encoder:      Linear<B>,
    pub visible_bias: Param<Tensor<B, 1>>,
}

impl<B: Backend> AutoEncoder<B> {
    pub fn new(conf: &LayerConf, device: &B::Device) -> Self {
        Self {
            encoder:      LinearConfig::new(conf.n_in, conf.n_out).init(device),
            visible_bias: Param::from_tensor(Tensor::zeros([conf.n_in], device)),
        }
    }

    pub fn encode(&self, act: Activation, x: Tensor<B, 2>) -> Tensor<B, 2> {
        activate(act, self.encoder.forward(x))
    }

    pub fn decode(&self, act: Activation, hidden: Tensor<B, 2>) -> Tensor<B, 2> {
        let weight = self.encoder.weight.val(); // [n_in, n_out]
        let recon  = hidden.matmul(weight.transpose()) + self.visible_bias.val().unsqueeze::<2>();
        activate(act, recon)
    }

    /// Zero each input with probability `level`.
    pub fn corrupt(&self, x: Tensor<B, 2>, level: f64) -> Tensor<B, 2> {
        if level <= 0.0 {
            return x;
        }
        let mask = Tensor::<B, 2>::random(x.shape(), Distribution::Bernoulli(1.0 - level), &x.device());
        x * mask
    }

    /// Corrupt, encode, decode: the autoencoder's training forward pass.
    pub fn reconstruct(&self, act: Activation, x: Tensor<B, 2>, corruption: f64) -> Tensor<B, 2> {
        let hidden = self.encode(act, self.corrupt(x, corruption));
        self.decode(act, hidden)
    }

    /// Flattened parameters: weight, hidden bias, visible bias.
    pub fn params(&self) -> Result<Vec<f32>> {
        let mut out = Vec::with_capacity(self.num_params());
        linear_params(&self.encoder, &mut out)?;
        flatten(self.visible_bias.val(), &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::architecture::LayerKind;
    use burn::backend::NdArray;

    type B = NdArray;

    fn layer(kind: LayerKind, n_in: usize, n_out: usize) -> LayerConf {
        serde_json::from_value(serde_json::json!({
            "layerType": kind, "nIn": n_in, "nOut": n_out
        }))
        .unwrap()
    }

    #[test]
    fn test_mlp_shapes_and_param_count() {
        let device = Default::default();
        let conf   = MultiLayerConf {
            confs: vec![layer(LayerKind::Dense, 4, 5), layer(LayerKind::Output, 5, 3)],
            seed:  None,
        };
        let net = MultiLayerNetwork::<B>::new(&conf, &device).unwrap();

        let x   = Tensor::<B, 2>::zeros([2, 4], &device);
        let out = net.model.forward(&net.activations, x);
        assert_eq!(out.dims(), [2, 3]);

        let params = net.params().unwrap();
        assert_eq!(params.len(), 4 * 5 + 5 + 5 * 3 + 3);
        assert_eq!(params.len(), net.num_params());
    }

    #[test]
    fn test_width_mismatch() {
        let conf = MultiLayerConf {
            confs: vec![layer(LayerKind::Dense, 4, 5), layer(LayerKind::Output, 6, 3)],
            seed:  None,
        };
        let err = MultiLayerNetwork::<B>::new(&conf, &Default::default()).unwrap_err();
        assert!(matches!(
            err,
            TrainError::LayerWidthMismatch { index: 1, expected: 6, found: 5 }
        ));
    }

    #[test]
    fn test_autoencoder_reconstruction_shape() {
        let device = Default::default();
        let ae     = AutoEncoder::<B>::new(&layer(LayerKind::AutoEncoder, 6, 2), &device);
        let x      = Tensor::<B, 2>::ones([3, 6], &device);
        let recon  = ae.reconstruct(Activation::Sigmoid, x, 0.3);
        assert_eq!(recon.dims(), [3, 6]);
        assert_eq!(ae.params().unwrap().len(), 6 * 2 + 2 + 6);
    }
}
