//! Neural network controller for vehicles.
//!
//! A fixed-topology perceptron with one tanh hidden layer and a tanh output
//! layer. The brain is a pure function of its input vector; any state fed
//! back between ticks lives on the vehicle.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

pub mod mlp;

pub use mlp::Mlp;

/// Layer sizes of a brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainLayout {
    /// Input units.
    pub inputs: usize,
    /// Hidden units.
    pub hidden: usize,
    /// Output units.
    pub outputs: usize,
}

impl BrainLayout {
    /// Layout with two outputs (steer, throttle).
    pub fn new(inputs: usize, hidden: usize) -> Self {
        Self {
            inputs,
            hidden,
            outputs: 2,
        }
    }

    /// Genome length: `(inputs + 1) * hidden + (hidden + 1) * outputs`.
    pub fn genome_len(&self) -> usize {
        Mlp::genome_len(self.inputs, self.hidden) + Mlp::genome_len(self.hidden, self.outputs)
    }
}

/// Everything computed by one forward pass, kept for introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activations {
    /// Input vector fed to the network.
    pub inputs: Array1<f32>,
    /// Hidden layer activations.
    pub hidden: Array1<f32>,
    /// Output activations, each in `[-1, 1]`.
    pub outputs: Array1<f32>,
}

/// Feed-forward network that maps sensor readings to steering and throttle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    layout: BrainLayout,
    hidden: Mlp,
    output: Mlp,
}

impl Brain {
    /// Creates a brain whose genes are uniform in `[-scale, scale)`.
    pub fn new_random<R: Rng + ?Sized>(layout: BrainLayout, scale: f32, rng: &mut R) -> Self {
        Self {
            layout,
            hidden: Mlp::new_random(layout.inputs, layout.hidden, scale, rng),
            output: Mlp::new_random(layout.hidden, layout.outputs, scale, rng),
        }
    }

    /// Assembles a brain from a flat genome.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidGenomeLength`] unless `genes.len()` equals
    /// [`BrainLayout::genome_len`]. The genome is never truncated or padded.
    pub fn from_genome(layout: BrainLayout, genes: &[f32]) -> Result<Self> {
        let expected = layout.genome_len();
        if genes.len() != expected {
            return Err(SimError::InvalidGenomeLength {
                expected,
                actual: genes.len(),
            });
        }

        let split = Mlp::genome_len(layout.inputs, layout.hidden);
        Ok(Self {
            layout,
            hidden: Mlp::from_genes(layout.inputs, layout.hidden, &genes[..split]),
            output: Mlp::from_genes(layout.hidden, layout.outputs, &genes[split..]),
        })
    }

    /// Layer sizes of this brain.
    pub fn layout(&self) -> BrainLayout {
        self.layout
    }

    /// Hidden and output layers, in evaluation order.
    pub fn layers(&self) -> [&Mlp; 2] {
        [&self.hidden, &self.output]
    }

    /// Flattens all weights and biases into the genome.
    pub fn genome(&self) -> Vec<f32> {
        let mut genes = Vec::with_capacity(self.layout.genome_len());
        self.hidden.write_genes(&mut genes);
        self.output.write_genes(&mut genes);
        genes
    }

    /// Runs a forward pass.
    #[inline]
    pub fn predict(&self, inputs: &Array1<f32>) -> Array1<f32> {
        self.output.forward(&self.hidden.forward(inputs))
    }

    /// Runs a forward pass and keeps every intermediate activation.
    pub fn predict_traced(&self, inputs: Array1<f32>) -> Activations {
        let hidden = self.hidden.forward(&inputs);
        let outputs = self.output.forward(&hidden);
        Activations {
            inputs,
            hidden,
            outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout() -> BrainLayout {
        BrainLayout::new(11, 12)
    }

    #[test]
    fn test_genome_len_formula() {
        assert_eq!(layout().genome_len(), 12 * 12 + 13 * 2);
    }

    #[test]
    fn test_random_brain_respects_scale() {
        let mut rng = StdRng::seed_from_u64(3);
        let brain = Brain::new_random(layout(), 2.0, &mut rng);
        let genes = brain.genome();
        assert_eq!(genes.len(), layout().genome_len());
        assert!(genes.iter().all(|g| (-2.0..2.0).contains(g)));
        // scaled wider than the unit interval
        assert!(genes.iter().any(|g| g.abs() > 1.0));
    }

    #[test]
    fn test_genome_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        let brain = Brain::new_random(layout(), 2.0, &mut rng);
        let rebuilt = Brain::from_genome(layout(), &brain.genome()).unwrap();
        assert_eq!(rebuilt, brain);
    }

    #[test]
    fn test_wrong_genome_length_rejected() {
        let genes = vec![0.0; layout().genome_len() - 1];
        assert!(matches!(
            Brain::from_genome(layout(), &genes),
            Err(SimError::InvalidGenomeLength {
                expected: 170,
                actual: 169
            })
        ));
        let genes = vec![0.0; layout().genome_len() + 1];
        assert!(Brain::from_genome(layout(), &genes).is_err());
    }

    #[test]
    fn test_zero_brain_outputs_zero() {
        let brain = Brain::from_genome(layout(), &vec![0.0; layout().genome_len()]).unwrap();
        let out = brain.predict(&Array1::ones(11));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_traced_matches_predict() {
        let mut rng = StdRng::seed_from_u64(5);
        let brain = Brain::new_random(layout(), 2.0, &mut rng);
        let inputs = Array1::linspace(0.0, 1.0, 11);
        let trace = brain.predict_traced(inputs.clone());
        assert_eq!(trace.outputs, brain.predict(&inputs));
        assert_eq!(trace.hidden.len(), 12);
        assert!(trace.outputs.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}
