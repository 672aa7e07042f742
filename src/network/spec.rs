use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};

/// Layer widths of a sequential classifier.
///
/// `inputs → hidden[0] → … → hidden[n-1] → classes`, with a ReLU after every
/// hidden layer and fused softmax/cross-entropy on the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Features per sample.
    pub inputs: usize,
    /// Widths of the hidden layers, input side first.
    #[serde(default)]
    pub hidden: Vec<usize>,
    /// Number of output classes.
    pub classes: usize,
}

impl NetworkSpec {
    pub fn new(inputs: usize, hidden: Vec<usize>, classes: usize) -> NetworkSpec {
        NetworkSpec {
            inputs,
            hidden,
            classes,
        }
    }

    /// All widths in order, inputs and classes included.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden.len() + 2);
        sizes.push(self.inputs);
        sizes.extend(&self.hidden);
        sizes.push(self.classes);
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes().contains(&0) {
            return Err(NnError::InvalidConfig(format!(
                "layer sizes must be non-zero, got {:?}",
                self.layer_sizes()
            )));
        }
        if self.classes < 2 {
            return Err(NnError::InvalidConfig(format!(
                "a classifier needs at least 2 classes, got {}",
                self.classes
            )));
        }
        Ok(())
    }
}

impl Default for NetworkSpec {
    /// The 2 → 64 → 3 spiral classifier.
    fn default() -> Self {
        NetworkSpec::new(2, vec![64], 3)
    }
}
