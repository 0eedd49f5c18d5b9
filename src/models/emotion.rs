//! Emotion label set and the distributions computed over it.
//!
//! [`EmotionLabel::ALL`] fixes the canonical label order. Every
//! [`ProbabilityVector`] is indexed in that order, regardless of which
//! classifier produced it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::JarError;

/// Tolerance allowed on the sum of an incoming distribution before renormalization.
pub const SUM_TOLERANCE: f32 = 1e-3;

/// One of the four fixed emotion categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Anger,
    Fear,
    Joy,
    Sadness,
}

impl EmotionLabel {
    /// Number of labels in the closed set.
    pub const COUNT: usize = 4;

    /// Canonical label order.
    pub const ALL: [EmotionLabel; Self::COUNT] = [
        EmotionLabel::Anger,
        EmotionLabel::Fear,
        EmotionLabel::Joy,
        EmotionLabel::Sadness,
    ];

    /// Position of this label in canonical order.
    pub fn index(self) -> usize {
        match self {
            EmotionLabel::Anger => 0,
            EmotionLabel::Fear => 1,
            EmotionLabel::Joy => 2,
            EmotionLabel::Sadness => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Anger => "anger",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Joy => "joy",
            EmotionLabel::Sadness => "sadness",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = JarError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anger" => Ok(EmotionLabel::Anger),
            "fear" => Ok(EmotionLabel::Fear),
            "joy" => Ok(EmotionLabel::Joy),
            "sadness" => Ok(EmotionLabel::Sadness),
            other => Err(JarError::InvalidInput(format!(
                "Unknown emotion label '{}'. Expected one of: anger, fear, joy, sadness",
                other
            ))),
        }
    }
}

/// Categorical distribution over [`EmotionLabel`] in canonical order.
///
/// Values are non-negative and sum to 1. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 4]")]
pub struct ProbabilityVector([f32; EmotionLabel::COUNT]);

impl TryFrom<[f32; EmotionLabel::COUNT]> for ProbabilityVector {
    type Error = JarError;

    fn try_from(values: [f32; EmotionLabel::COUNT]) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl ProbabilityVector {
    /// Validate and renormalize a canonical-order score array.
    ///
    /// Rejects non-finite or negative values, and sums further than
    /// [`SUM_TOLERANCE`] from 1.
    pub fn new(values: [f32; EmotionLabel::COUNT]) -> Result<Self, JarError> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(JarError::InvalidDistribution(format!(
                "value {} is not a probability",
                bad
            )));
        }

        let sum: f32 = values.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(JarError::InvalidDistribution(format!(
                "values sum to {}, expected 1",
                sum
            )));
        }

        Ok(Self(values.map(|v| v / sum)))
    }

    /// Build without validation. Callers guarantee the simplex invariant.
    pub(crate) fn from_simplex(values: [f32; EmotionLabel::COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f32; EmotionLabel::COUNT] {
        &self.0
    }

    pub fn get(&self, label: EmotionLabel) -> f32 {
        self.0[label.index()]
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Label with the highest probability.
    ///
    /// Exact ties resolve to the lowest canonical index.
    pub fn argmax(&self) -> EmotionLabel {
        let mut best = 0;
        for (idx, value) in self.0.iter().enumerate().skip(1) {
            if *value > self.0[best] {
                best = idx;
            }
        }
        EmotionLabel::ALL[best]
    }

    /// `(label, probability)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f32)> + '_ {
        EmotionLabel::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

/// Ensemble decision for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub label: EmotionLabel,
    pub combined: ProbabilityVector,
    /// Canonical-order inputs the verdict was combined from.
    pub members: [ProbabilityVector; 2],
    /// Both models' own argmax matched `label`.
    pub unanimous: bool,
}

impl Verdict {
    /// Combined probability of the chosen label.
    pub fn confidence(&self) -> f32 {
        self.combined.get(self.label)
    }
}
