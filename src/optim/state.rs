use crate::layers::dense::{Dense, LayerShape};
use crate::math::matrix::Matrix;

/// Zero-initialised buffers shaped like one layer's weights and biases.
///
/// An optimizer owns one per layer slot, allocated when the optimizer is
/// built, and mutates them in place on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamState {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl ParamState {
    pub fn zeros(shape: LayerShape) -> ParamState {
        ParamState {
            weights: Matrix::zeros((shape.inputs, shape.neurons)),
            biases: Matrix::zeros((1, shape.neurons)),
        }
    }

    /// One state record per layer, in layer order.
    pub fn for_layers(shapes: &[LayerShape]) -> Vec<ParamState> {
        shapes.iter().copied().map(ParamState::zeros).collect()
    }

    pub fn shape(&self) -> LayerShape {
        LayerShape {
            inputs: self.weights.nrows(),
            neurons: self.weights.ncols(),
        }
    }
}

/// Looks up the state for `slot` and checks it was built for `layer`.
///
/// # Panics
/// Panics on an unknown slot or a layer whose shape differs from the one the
/// optimizer was built with.
pub fn slot_mut<'a>(states: &'a mut [ParamState], slot: usize, layer: &Dense) -> &'a mut ParamState {
    let count = states.len();
    let state = states
        .get_mut(slot)
        .unwrap_or_else(|| panic!("optimizer has no state for layer slot {} ({} slots)", slot, count));
    assert_eq!(
        state.shape(),
        layer.shape(),
        "optimizer state for slot {} does not match the layer shape",
        slot
    );
    state
}
