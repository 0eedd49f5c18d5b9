//! Classifier seam: the external inference contract and its adapters.
//!
//! An [`EmotionClassifier`] returns scores in its own index order and declares
//! that order through [`EmotionClassifier::labels`]. A [`ClassifierAdapter`]
//! validates the declared order once at startup ([`LabelOrder`]) and tags every
//! output with it, so the ensemble never relies on positional agreement
//! between two independently trained models.

pub mod candle_backend;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::emotion::{EmotionLabel, ProbabilityVector};
use crate::JarError;

pub use candle_backend::CandleEmotionClassifier;

/// External text classifier producing a distribution over its own labels.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Label names in the classifier's index order.
    fn labels(&self) -> &[String];

    /// Classify text into one probability per entry of [`labels`](Self::labels).
    async fn classify(&self, text: &str) -> Result<Vec<f32>, JarError>;

    /// Whether the underlying model is loaded.
    fn is_available(&self) -> bool;
}

/// Validated mapping from a classifier's output index to the canonical label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelOrder([EmotionLabel; EmotionLabel::COUNT]);

impl LabelOrder {
    /// The canonical order itself.
    pub const CANONICAL: LabelOrder = LabelOrder(EmotionLabel::ALL);

    /// Build from a classifier's declared label names.
    ///
    /// Names must cover the four canonical labels exactly once each.
    pub fn from_names<S: AsRef<str>>(model: &str, names: &[S]) -> Result<Self, JarError> {
        if names.len() != EmotionLabel::COUNT {
            return Err(JarError::label_mismatch(
                model,
                format!(
                    "declares {} labels, expected {}",
                    names.len(),
                    EmotionLabel::COUNT
                ),
            ));
        }

        let mut order = EmotionLabel::ALL;
        let mut seen = [false; EmotionLabel::COUNT];
        for (slot, name) in names.iter().enumerate() {
            let label: EmotionLabel = name.as_ref().parse().map_err(|_| {
                JarError::label_mismatch(
                    model,
                    format!("unknown label '{}' at index {}", name.as_ref(), slot),
                )
            })?;
            if seen[label.index()] {
                return Err(JarError::label_mismatch(
                    model,
                    format!("label '{}' declared more than once", label),
                ));
            }
            seen[label.index()] = true;
            order[slot] = label;
        }

        Ok(Self(order))
    }

    /// Label at a classifier output index.
    pub fn label_at(&self, idx: usize) -> Option<EmotionLabel> {
        self.0.get(idx).copied()
    }

    /// Reorder classifier-indexed scores into a canonical [`ProbabilityVector`].
    pub fn canonicalize(&self, scores: &[f32]) -> Result<ProbabilityVector, JarError> {
        if scores.len() != EmotionLabel::COUNT {
            return Err(JarError::InvalidDistribution(format!(
                "got {} scores, expected {}",
                scores.len(),
                EmotionLabel::COUNT
            )));
        }

        let mut canonical = [0.0f32; EmotionLabel::COUNT];
        for (label, score) in self.0.iter().zip(scores) {
            canonical[label.index()] = *score;
        }
        ProbabilityVector::new(canonical)
    }
}

/// One classifier's raw output, tagged with the order it was produced in.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    pub model: String,
    pub order: LabelOrder,
    pub scores: Vec<f32>,
}

impl ModelOutput {
    /// Canonical-order distribution for this output.
    ///
    /// A malformed vector means the classifier broke its contract and is
    /// reported as [`JarError::ModelUnavailable`].
    pub fn distribution(&self) -> Result<ProbabilityVector, JarError> {
        self.order
            .canonicalize(&self.scores)
            .map_err(|e| JarError::model_unavailable(&self.model, e.to_string()))
    }
}

/// Wraps one external classifier with its startup-validated label order.
#[derive(Clone)]
pub struct ClassifierAdapter {
    name: String,
    classifier: Arc<dyn EmotionClassifier>,
    order: LabelOrder,
}

impl ClassifierAdapter {
    /// Validate the classifier's declared labels.
    ///
    /// Fails with [`JarError::LabelOrderingMismatch`]; call during startup only.
    pub fn new(
        name: impl Into<String>,
        classifier: Arc<dyn EmotionClassifier>,
    ) -> Result<Self, JarError> {
        let name = name.into();
        let order = LabelOrder::from_names(&name, classifier.labels())?;
        Ok(Self {
            name,
            classifier,
            order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> LabelOrder {
        self.order
    }

    pub fn is_available(&self) -> bool {
        self.classifier.is_available()
    }

    /// Run the classifier. Not retried on failure.
    pub async fn classify(&self, text: &str) -> Result<ModelOutput, JarError> {
        let scores = self.classifier.classify(text).await?;
        Ok(ModelOutput {
            model: self.name.clone(),
            order: self.order,
            scores,
        })
    }
}

fn canonical_names() -> Vec<String> {
    EmotionLabel::ALL.iter().map(|l| l.to_string()).collect()
}

/// Classifier that returns the same scores for every input.
///
/// Counts its invocations. Used in tests and local dry runs.
pub struct FixedClassifier {
    labels: Vec<String>,
    scores: Vec<f32>,
    calls: AtomicUsize,
}

impl FixedClassifier {
    /// Scores given in canonical label order.
    pub fn new(scores: Vec<f32>) -> Self {
        Self::with_labels(canonical_names(), scores)
    }

    /// Scores given in the order of `labels`.
    pub fn with_labels(labels: Vec<String>, scores: Vec<f32>) -> Self {
        Self {
            labels,
            scores,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmotionClassifier for FixedClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    async fn classify(&self, _text: &str) -> Result<Vec<f32>, JarError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.scores.clone())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in for a classifier whose model failed to load.
///
/// Declares the canonical labels and fails every call.
pub struct UnavailableClassifier {
    model: String,
    reason: String,
    labels: Vec<String>,
}

impl UnavailableClassifier {
    pub fn new(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reason: reason.into(),
            labels: canonical_names(),
        }
    }
}

#[async_trait]
impl EmotionClassifier for UnavailableClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    async fn classify(&self, _text: &str) -> Result<Vec<f32>, JarError> {
        Err(JarError::model_unavailable(&self.model, &self.reason))
    }

    fn is_available(&self) -> bool {
        false
    }
}
