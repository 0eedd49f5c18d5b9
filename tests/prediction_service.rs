//! End-to-end prediction pipeline tests over test-double classifiers.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::harness::service_with;
use common::{fixed_service, CorpusBuilder};
use quranjar::classifier::{FixedClassifier, UnavailableClassifier};
use quranjar::models::{EmotionLabel, NO_VERSE_FALLBACK};
use quranjar::services::{VerseIndex, VerseSelector};
use quranjar::JarError;

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "{:?} != {:?}", actual, expected);
    }
}

#[tokio::test]
async fn test_averages_two_models_and_cites_anger_verse() {
    let corpus = CorpusBuilder::balanced();
    let service = fixed_service(
        [0.7, 0.1, 0.1, 0.1],
        [0.5, 0.2, 0.2, 0.1],
        corpus.entries(),
    );

    let response = service.predict("I am so angry right now").await.unwrap();

    assert_eq!(response.predicted_emotion, EmotionLabel::Anger);
    assert_close(response.probabilities.values(), &[0.6, 0.15, 0.15, 0.1]);
    assert_eq!(
        response.quranic_verse,
        "and those who restrain anger (Surah 3, Verse 134)"
    );
}

#[tokio::test]
async fn test_missing_verse_still_succeeds_with_fallback() {
    let corpus = CorpusBuilder::new()
        .verse(EmotionLabel::Anger, "and those who restrain anger", 3, 134)
        .verse(EmotionLabel::Fear, "do not fear", 20, 46);
    let service = fixed_service(
        [0.1, 0.1, 0.1, 0.7],
        [0.2, 0.1, 0.1, 0.6],
        corpus.entries(),
    );

    let response = service.predict("I miss them so much").await.unwrap();

    assert_eq!(response.predicted_emotion, EmotionLabel::Sadness);
    assert_eq!(response.quranic_verse, NO_VERSE_FALLBACK);
    assert_eq!(
        response.quranic_verse,
        "No verse found for the predicted emotion."
    );
}

#[tokio::test]
async fn test_blank_input_never_reaches_classifiers() {
    let a = Arc::new(FixedClassifier::new(vec![0.25; 4]));
    let b = Arc::new(FixedClassifier::new(vec![0.25; 4]));
    let service = service_with(a.clone(), b.clone(), CorpusBuilder::balanced().entries());

    for text in ["", "   "] {
        match service.predict(text).await {
            Err(JarError::InvalidInput(msg)) => assert_eq!(msg, "Input text is required"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    assert_eq!(a.calls(), 0);
    assert_eq!(b.calls(), 0);
}

#[tokio::test]
async fn test_each_model_runs_once_per_request() {
    let a = Arc::new(FixedClassifier::new(vec![0.1, 0.1, 0.7, 0.1]));
    let b = Arc::new(FixedClassifier::new(vec![0.1, 0.1, 0.7, 0.1]));
    let service = service_with(a.clone(), b.clone(), CorpusBuilder::balanced().entries());

    service.predict("what a wonderful day").await.unwrap();
    service.predict("still wonderful").await.unwrap();

    assert_eq!(a.calls(), 2);
    assert_eq!(b.calls(), 2);
}

#[tokio::test]
async fn test_reversed_label_order_is_normalized() {
    // Model B reports sadness, joy, fear, anger.
    let reversed = FixedClassifier::with_labels(
        vec![
            "sadness".to_string(),
            "joy".to_string(),
            "fear".to_string(),
            "anger".to_string(),
        ],
        vec![0.1, 0.2, 0.2, 0.5],
    );
    let service = service_with(
        Arc::new(FixedClassifier::new(vec![0.7, 0.1, 0.1, 0.1])),
        Arc::new(reversed),
        CorpusBuilder::balanced().entries(),
    );

    let report = service.predict_detailed("furious").await.unwrap();

    assert_eq!(report.response.predicted_emotion, EmotionLabel::Anger);
    assert_close(
        report.response.probabilities.values(),
        &[0.6, 0.15, 0.15, 0.1],
    );
    assert_close(report.models[1].probabilities.values(), &[0.5, 0.2, 0.2, 0.1]);
    assert!(report.unanimous);
}

#[tokio::test]
async fn test_exact_tie_picks_lowest_canonical_label() {
    let service = fixed_service(
        [0.1, 0.4, 0.4, 0.1],
        [0.1, 0.4, 0.4, 0.1],
        CorpusBuilder::balanced().entries(),
    );

    for _ in 0..20 {
        let response = service.predict("torn").await.unwrap();
        assert_eq!(response.predicted_emotion, EmotionLabel::Fear);
    }
}

#[tokio::test]
async fn test_unavailable_model_fails_whole_request() {
    let service = service_with(
        Arc::new(UnavailableClassifier::new("bert", "weights not found")),
        Arc::new(FixedClassifier::new(vec![0.7, 0.1, 0.1, 0.1])),
        CorpusBuilder::balanced().entries(),
    );

    let err = service.predict("hello").await.unwrap_err();
    match err {
        JarError::ModelUnavailable { model, message } => {
            assert_eq!(model, "bert");
            assert!(message.contains("weights not found"));
        }
        other => panic!("expected ModelUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_model_output_is_model_unavailable() {
    let service = fixed_service(
        [0.9, 0.9, 0.9, 0.9],
        [0.25, 0.25, 0.25, 0.25],
        CorpusBuilder::balanced().entries(),
    );

    let err = service.predict("hello").await.unwrap_err();
    assert!(matches!(err, JarError::ModelUnavailable { ref model, .. } if model == "bert"));
}

#[test]
fn test_random_selection_covers_group_and_stays_in_label() {
    let corpus = CorpusBuilder::new()
        .verse(EmotionLabel::Joy, "joy one", 1, 1)
        .verse(EmotionLabel::Joy, "joy two", 1, 2)
        .verse(EmotionLabel::Joy, "joy three", 1, 3)
        .verse(EmotionLabel::Anger, "anger one", 2, 1);
    let selector = VerseSelector::with_thread_rng(Arc::new(VerseIndex::from_entries(
        corpus.entries(),
    )));

    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let entry = selector
            .select(EmotionLabel::Joy)
            .entry()
            .cloned()
            .expect("joy group is not empty");
        assert_eq!(entry.label, EmotionLabel::Joy);
        seen.insert(entry.text);
    }
    assert_eq!(seen.len(), 3);
}

#[tokio::test]
async fn test_concurrent_requests_share_service() {
    let service = Arc::new(fixed_service(
        [0.1, 0.7, 0.1, 0.1],
        [0.1, 0.6, 0.2, 0.1],
        CorpusBuilder::balanced().entries(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move { service.predict(&format!("request {}", i)).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.predicted_emotion, EmotionLabel::Fear);
        assert_eq!(
            response.quranic_verse,
            "do not fear, indeed I am with you (Surah 20, Verse 46)"
        );
    }
}
