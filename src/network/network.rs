use rand::Rng;
use tracing::debug;

use crate::activation::relu::ReLU;
use crate::data::labels::Labels;
use crate::error::{NnError, Result};
use crate::layers::dense::{Dense, LayerShape};
use crate::loss::softmax_cross_entropy::SoftmaxCrossEntropy;
use crate::math::matrix::Matrix;
use crate::network::spec::NetworkSpec;
use crate::optim::Optimizer;

/// Sequential classifier: `Dense → ReLU → … → Dense → softmax/cross-entropy`.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Dense>,
    activations: Vec<ReLU>, // one after every layer but the last
    output: SoftmaxCrossEntropy,
}

impl Network {
    /// Builds a freshly initialised network from a layer spec.
    pub fn new<R: Rng>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let sizes = spec.layer_sizes();
        let layers = sizes
            .windows(2)
            .map(|pair| Dense::new(pair[0], pair[1], rng))
            .collect();
        debug!(?sizes, "built network");
        Network::from_layers(layers)
    }

    /// Wires existing layers into a network.
    ///
    /// Fails if the list is empty or a layer's input width differs from the
    /// previous layer's output width.
    pub fn from_layers(layers: Vec<Dense>) -> Result<Network> {
        if layers.is_empty() {
            return Err(NnError::InvalidConfig("a network needs at least one layer".into()));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            let (prev, next) = (pair[0].shape(), pair[1].shape());
            if prev.neurons != next.inputs {
                return Err(NnError::shape_mismatch(
                    format!("layer {} input", i + 1),
                    prev.neurons,
                    next.inputs,
                ));
            }
        }
        let activations = (1..layers.len()).map(|_| ReLU::new()).collect();
        Ok(Network {
            layers,
            activations,
            output: SoftmaxCrossEntropy::new(),
        })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    pub fn layer_shapes(&self) -> Vec<LayerShape> {
        self.layers.iter().map(Dense::shape).collect()
    }

    /// Features expected per sample.
    pub fn input_width(&self) -> usize {
        self.layers[0].shape().inputs
    }

    pub fn classes(&self) -> usize {
        self.layers[self.layers.len() - 1].shape().neurons
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Dense::parameter_count).sum()
    }

    /// Checks that a batch fits this network before any numeric work runs.
    pub fn check_batch(&self, features: &Matrix, labels: &Labels) -> Result<()> {
        if features.ncols() != self.input_width() {
            return Err(NnError::shape_mismatch(
                "feature columns",
                self.input_width(),
                features.ncols(),
            ));
        }
        if labels.len() != features.nrows() {
            return Err(NnError::shape_mismatch("label count", features.nrows(), labels.len()));
        }
        match labels {
            Labels::Sparse(indices) => {
                if let Some(&bad) = indices.iter().find(|&&c| c >= self.classes()) {
                    return Err(NnError::shape_mismatch(
                        "label index",
                        format!("< {}", self.classes()),
                        bad,
                    ));
                }
            }
            Labels::OneHot(rows) => {
                if rows.ncols() != self.classes() {
                    return Err(NnError::shape_mismatch(
                        "one-hot label columns",
                        self.classes(),
                        rows.ncols(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Logits of the last layer; every unit caches what its backward needs.
    fn logits(&mut self, inputs: &Matrix) -> Matrix {
        let last = self.layers.len() - 1;
        let mut current = self.layers[0].forward(inputs);
        for i in 0..last {
            current = self.activations[i].forward(&current);
            current = self.layers[i + 1].forward(&current);
        }
        current
    }

    /// Full forward pass ending at the loss; returns the mean loss.
    pub fn forward(&mut self, inputs: &Matrix, labels: &Labels) -> f64 {
        let logits = self.logits(inputs);
        self.output.forward(&logits, labels)
    }

    /// Class probabilities without computing a loss.
    pub fn predict(&mut self, inputs: &Matrix) -> Matrix {
        let logits = self.logits(inputs);
        self.output.predict(&logits)
    }

    /// Softmax probabilities of the last `forward` or `predict` call.
    pub fn output(&self) -> &Matrix {
        self.output.output()
    }

    /// Backpropagates from the fused output unit through every layer in
    /// reverse order. Must follow `forward` with the same labels.
    pub fn backward(&mut self, labels: &Labels) {
        let probabilities = self.output.output().clone();
        let mut grad = self.output.backward(&probabilities, labels).clone();

        for i in (0..self.layers.len()).rev() {
            grad = self.layers[i].backward(&grad).clone();
            if i > 0 {
                grad = self.activations[i - 1].backward(&grad).clone();
            }
        }
    }

    /// Hands every layer to the optimizer, slot = layer index.
    pub fn apply(&mut self, optimizer: &mut dyn Optimizer) {
        for (slot, layer) in self.layers.iter_mut().enumerate() {
            optimizer.update_params(slot, layer);
        }
    }
}
