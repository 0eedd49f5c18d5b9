//! Prediction pipeline: validate, classify twice, combine, cite.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::ClassifierAdapter;
use crate::models::emotion::{EmotionLabel, ProbabilityVector};
use crate::services::ensemble::EnsembleCombiner;
use crate::services::verse::VerseSelector;
use crate::JarError;

/// Message returned for missing or blank request text.
pub const EMPTY_INPUT_MESSAGE: &str = "Input text is required";

/// Wire response of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_emotion: EmotionLabel,
    /// Combined distribution in canonical label order
    pub probabilities: ProbabilityVector,
    pub quranic_verse: String,
}

/// One model's contribution to a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelContribution {
    pub model: String,
    pub predicted: EmotionLabel,
    pub probabilities: ProbabilityVector,
}

/// Response plus the per-model distributions behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    #[serde(flatten)]
    pub response: PredictionResponse,
    pub models: [ModelContribution; 2],
    /// Both models' own argmax agreed with the ensemble
    pub unanimous: bool,
}

/// Orchestrates two classifier adapters, the combiner and the verse selector.
///
/// Holds only startup-built, read-only handles; safe to share across
/// concurrent requests.
#[derive(Clone)]
pub struct PredictionService {
    model_a: ClassifierAdapter,
    model_b: ClassifierAdapter,
    combiner: EnsembleCombiner,
    selector: VerseSelector,
}

impl PredictionService {
    pub fn new(
        model_a: ClassifierAdapter,
        model_b: ClassifierAdapter,
        combiner: EnsembleCombiner,
        selector: VerseSelector,
    ) -> Self {
        Self {
            model_a,
            model_b,
            combiner,
            selector,
        }
    }

    pub fn models(&self) -> [&ClassifierAdapter; 2] {
        [&self.model_a, &self.model_b]
    }

    pub fn selector(&self) -> &VerseSelector {
        &self.selector
    }

    /// Predict an emotion and cite a matching verse.
    pub async fn predict(&self, raw_text: &str) -> Result<PredictionResponse, JarError> {
        Ok(self.predict_detailed(raw_text).await?.response)
    }

    /// Like [`predict`](Self::predict), keeping both models' distributions.
    ///
    /// Blank text fails with [`JarError::InvalidInput`] before any classifier
    /// runs. A missing verse yields the fallback citation, not an error.
    pub async fn predict_detailed(&self, raw_text: &str) -> Result<PredictionReport, JarError> {
        if raw_text.trim().is_empty() {
            return Err(JarError::InvalidInput(EMPTY_INPUT_MESSAGE.to_string()));
        }

        let (out_a, out_b) = tokio::try_join!(
            self.model_a.classify(raw_text),
            self.model_b.classify(raw_text)
        )?;

        let verdict = self.combiner.combine(&out_a, &out_b)?;
        let [dist_a, dist_b] = verdict.members;

        debug!(model = %out_a.model, probabilities = ?dist_a.values(), "model distribution");
        debug!(model = %out_b.model, probabilities = ?dist_b.values(), "model distribution");

        let lookup = self.selector.select(verdict.label);
        let citation = lookup.citation();

        debug!(
            label = %verdict.label,
            confidence = verdict.confidence(),
            unanimous = verdict.unanimous,
            verse_found = lookup.entry().is_some(),
            "prediction complete"
        );

        Ok(PredictionReport {
            response: PredictionResponse {
                predicted_emotion: verdict.label,
                probabilities: verdict.combined,
                quranic_verse: citation,
            },
            models: [
                ModelContribution {
                    model: out_a.model,
                    predicted: dist_a.argmax(),
                    probabilities: dist_a,
                },
                ModelContribution {
                    model: out_b.model,
                    predicted: dist_b.argmax(),
                    probabilities: dist_b,
                },
            ],
            unanimous: verdict.unanimous,
        })
    }
}
