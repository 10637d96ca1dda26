//! Dense tanh layer.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single dense layer of a multi-layer perceptron.
///
/// In flat genome form each output unit contributes its input weights
/// followed by its bias, unit after unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with every parameter uniform in `[-scale, scale)`.
    ///
    /// Parameters are drawn in genome order.
    pub fn new_random<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        let genes: Vec<f32> = (0..Self::genome_len(input_size, output_size))
            .map(|_| rng.random_range(-scale..scale))
            .collect();
        Self::from_genes(input_size, output_size, &genes)
    }

    /// Builds a layer from exactly `genome_len(input_size, output_size)` genes.
    pub(crate) fn from_genes(input_size: usize, output_size: usize, genes: &[f32]) -> Self {
        let stride = input_size + 1;
        Self {
            weights: Array2::from_shape_fn((output_size, input_size), |(row, col)| {
                genes[row * stride + col]
            }),
            biases: Array1::from_shape_fn(output_size, |row| genes[row * stride + input_size]),
        }
    }

    /// Number of genes a layer of this shape occupies.
    pub fn genome_len(input_size: usize, output_size: usize) -> usize {
        (input_size + 1) * output_size
    }

    /// Appends this layer's parameters to `genes` in genome order.
    pub fn write_genes(&self, genes: &mut Vec<f32>) {
        for (row, bias) in self.weights.rows().into_iter().zip(self.biases.iter()) {
            genes.extend(row.iter().copied());
            genes.push(*bias);
        }
    }

    /// Performs forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }
}
