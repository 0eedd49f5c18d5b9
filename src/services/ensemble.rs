//! Two-model ensemble by weighted probability averaging.

use crate::classifier::ModelOutput;
use crate::config::EnsembleWeights;
use crate::models::emotion::{EmotionLabel, ProbabilityVector, Verdict};
use crate::JarError;

/// Merges two classifier distributions into one [`Verdict`].
///
/// Weights are normalized to sum to 1; the default is an unweighted mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleCombiner {
    weight_a: f32,
    weight_b: f32,
}

impl Default for EnsembleCombiner {
    fn default() -> Self {
        Self {
            weight_a: 0.5,
            weight_b: 0.5,
        }
    }
}

impl EnsembleCombiner {
    /// Build from configured weights. Both must be finite and positive.
    pub fn new(weights: EnsembleWeights) -> Result<Self, JarError> {
        let EnsembleWeights { model_a, model_b } = weights;
        for (name, w) in [("model_a", model_a), ("model_b", model_b)] {
            if !w.is_finite() || w <= 0.0 {
                return Err(JarError::Config(format!(
                    "ensemble weight {} must be positive, got {}",
                    name, w
                )));
            }
        }

        if model_a == model_b {
            return Ok(Self::default());
        }

        let total = model_a + model_b;
        Ok(Self {
            weight_a: model_a / total,
            weight_b: model_b / total,
        })
    }

    pub fn weights(&self) -> (f32, f32) {
        (self.weight_a, self.weight_b)
    }

    /// Canonicalize both outputs, then combine.
    pub fn combine(&self, a: &ModelOutput, b: &ModelOutput) -> Result<Verdict, JarError> {
        let dist_a = a.distribution()?;
        let dist_b = b.distribution()?;
        Ok(self.combine_canonical(&dist_a, &dist_b))
    }

    /// Weighted mean of two canonical distributions.
    ///
    /// The mean of two points on the simplex stays on the simplex. The label is
    /// the combined argmax, ties going to the lowest canonical index.
    pub fn combine_canonical(&self, a: &ProbabilityVector, b: &ProbabilityVector) -> Verdict {
        let mut combined = [0.0f32; EmotionLabel::COUNT];
        for (slot, (pa, pb)) in combined
            .iter_mut()
            .zip(a.values().iter().zip(b.values()))
        {
            *slot = self.weight_a * pa + self.weight_b * pb;
        }

        let combined = ProbabilityVector::from_simplex(combined);
        let label = combined.argmax();

        Verdict {
            label,
            combined,
            members: [*a, *b],
            unanimous: a.argmax() == label && b.argmax() == label,
        }
    }
}
