//! Test harness for data directory and service construction.
//!
//! Provides an isolated data directory per test using tempfile.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use quranjar::classifier::{ClassifierAdapter, EmotionClassifier, FixedClassifier};
use quranjar::config::CONFIG_FILE_NAME;
use quranjar::models::CorpusEntry;
use quranjar::services::{
    EnsembleCombiner, PredictionService, SequenceSource, VerseIndex, VerseSelector,
};

use super::builders::CorpusBuilder;

/// Corpus file name relative to the data directory (the default config value).
pub const CORPUS_FILE: &str = "dataset/quran_emotions.csv";

/// Test harness that owns a temporary data directory.
///
/// The directory is removed when the harness is dropped.
pub struct TestHarness {
    pub temp_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for test data");
        Self { temp_dir }
    }

    pub fn data_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write the corpus at the default location and return its path.
    pub fn write_corpus(&self, corpus: &CorpusBuilder) -> PathBuf {
        let path = self.data_path().join(CORPUS_FILE);
        std::fs::create_dir_all(path.parent().expect("corpus path has parent"))
            .expect("Failed to create dataset directory");
        std::fs::write(&path, corpus.to_csv()).expect("Failed to write corpus");
        path
    }

    /// Write `quranjar.toml` into the data directory.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.data_path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, contents).expect("Failed to write config");
        path
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a prediction service from two classifiers and a corpus.
///
/// Verse selection always picks the first entry of the group.
pub fn service_with(
    a: Arc<dyn EmotionClassifier>,
    b: Arc<dyn EmotionClassifier>,
    entries: Vec<CorpusEntry>,
) -> PredictionService {
    PredictionService::new(
        ClassifierAdapter::new("bert", a).expect("valid labels for model a"),
        ClassifierAdapter::new("roberta", b).expect("valid labels for model b"),
        EnsembleCombiner::default(),
        VerseSelector::new(
            Arc::new(VerseIndex::from_entries(entries)),
            Arc::new(SequenceSource::new(vec![0])),
        ),
    )
}

/// Service over two [`FixedClassifier`]s with canonical-order scores.
pub fn fixed_service(
    scores_a: [f32; 4],
    scores_b: [f32; 4],
    entries: Vec<CorpusEntry>,
) -> PredictionService {
    service_with(
        Arc::new(FixedClassifier::new(scores_a.to_vec())),
        Arc::new(FixedClassifier::new(scores_b.to_vec())),
        entries,
    )
}
