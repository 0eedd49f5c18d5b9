//! Startup phase shared by the HTTP server and CLI.
//!
//! Everything built here is immutable afterwards: the corpus index and both
//! classifiers are handed to [`PredictionService`] once and never reloaded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::classifier::{
    CandleEmotionClassifier, ClassifierAdapter, EmotionClassifier, UnavailableClassifier,
};
use crate::config::{load_config, resolve_data_path, AppConfig, ClassifierConfig};
use crate::corpus::load_corpus;
use crate::services::ensemble::EnsembleCombiner;
use crate::services::prediction::PredictionService;
use crate::services::verse::{VerseIndex, VerseSelector};
use crate::JarError;

/// Application context holding the configured, loaded services.
pub struct AppContext {
    pub data_path: PathBuf,
    pub config: AppConfig,
    pub prediction: Arc<PredictionService>,
}

impl AppContext {
    /// Load config, corpus and both classifiers.
    ///
    /// A classifier that fails to load is replaced by an unavailable stand-in
    /// so requests fail with `ModelUnavailable`. Label-order mismatches and
    /// corpus errors abort startup.
    pub async fn new(data_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let data_path = resolve_data_path(data_path);
        tracing::info!("Using data path: {}", data_path.display());

        let config = load_config(&data_path, config_path.as_deref())?;

        let corpus_path = config.corpus_path_in(&data_path);
        let index = load_corpus(&corpus_path)
            .with_context(|| format!("Failed to load corpus {}", corpus_path.display()))?;

        tracing::info!("Initializing classifiers...");
        let (classifier_a, classifier_b) = tokio::try_join!(
            spawn_load(config.model_a.clone(), data_path.clone()),
            spawn_load(config.model_b.clone(), data_path.clone())
        )?;

        let ctx = Self::from_parts(data_path, config, index, classifier_a, classifier_b)?;
        Ok(ctx)
    }

    /// Assemble a context from already-loaded parts.
    ///
    /// Validates both label orders and the ensemble weights.
    pub fn from_parts(
        data_path: PathBuf,
        config: AppConfig,
        index: VerseIndex,
        classifier_a: Arc<dyn EmotionClassifier>,
        classifier_b: Arc<dyn EmotionClassifier>,
    ) -> Result<Self, JarError> {
        let model_a = ClassifierAdapter::new(config.model_a.name.clone(), classifier_a)?;
        let model_b = ClassifierAdapter::new(config.model_b.name.clone(), classifier_b)?;
        if model_a.name() == model_b.name() {
            return Err(JarError::Config(format!(
                "both classifiers are named '{}'",
                model_a.name()
            )));
        }
        let combiner = EnsembleCombiner::new(config.weights)?;

        for model in [&model_a, &model_b] {
            if model.is_available() {
                tracing::info!("Classifier '{}' ready", model.name());
            } else {
                tracing::warn!("Classifier '{}' not available", model.name());
            }
        }

        let selector = VerseSelector::with_thread_rng(Arc::new(index));
        let prediction = Arc::new(PredictionService::new(model_a, model_b, combiner, selector));

        Ok(Self {
            data_path,
            config,
            prediction,
        })
    }
}

async fn spawn_load(
    config: ClassifierConfig,
    data_path: PathBuf,
) -> Result<Arc<dyn EmotionClassifier>> {
    let classifier = tokio::task::spawn_blocking(move || load_classifier(&config, &data_path))
        .await
        .context("Classifier loading task panicked")?;
    Ok(classifier)
}

/// Load one classifier, degrading to [`UnavailableClassifier`] on failure.
pub fn load_classifier(config: &ClassifierConfig, data_path: &Path) -> Arc<dyn EmotionClassifier> {
    match CandleEmotionClassifier::load(config, data_path) {
        Ok(classifier) => Arc::new(classifier),
        Err(e) => {
            tracing::warn!(
                "Failed to load classifier '{}': {:#}. Predictions will be unavailable.",
                config.name,
                e
            );
            Arc::new(UnavailableClassifier::new(&config.name, format!("{:#}", e)))
        }
    }
}
