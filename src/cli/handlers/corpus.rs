//! Corpus inspection: class distribution and imbalance check.
//!
//! Needs only the config and corpus file, no models are loaded.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{
    format_probability, output_json, print_header, print_hint, print_kv, print_table,
    print_warning, OutputMode,
};
use crate::config::{load_config, resolve_data_path};
use crate::corpus::load_corpus;
use crate::services::verse::{CorpusStats, DEFAULT_IMBALANCE_THRESHOLD};

#[derive(Serialize)]
struct CorpusReport {
    path: PathBuf,
    threshold: f64,
    #[serde(flatten)]
    stats: CorpusStats,
}

pub fn handle_corpus(
    data_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    threshold: Option<f64>,
    mode: OutputMode,
) -> Result<()> {
    let data_path = resolve_data_path(data_path);
    let config = load_config(&data_path, config_path.as_deref())?;
    let path = config.corpus_path_in(&data_path);
    let index = load_corpus(&path)
        .with_context(|| format!("Failed to load corpus {}", path.display()))?;

    let threshold = threshold.unwrap_or(DEFAULT_IMBALANCE_THRESHOLD);
    let report = CorpusReport {
        path,
        threshold,
        stats: index.stats_with_threshold(threshold),
    };

    if mode == OutputMode::Json {
        output_json(&report);
        return Ok(());
    }

    print_header("Corpus");
    print_kv("Path", &report.path.display().to_string());
    print_kv("Entries", &report.stats.total.to_string());

    let rows: Vec<Vec<String>> = report
        .stats
        .counts
        .iter()
        .map(|c| {
            vec![
                c.label.to_string(),
                c.count.to_string(),
                format_probability(c.share as f32),
            ]
        })
        .collect();
    println!();
    print_table(&["Emotion", "Verses", "Share"], rows);

    if report.stats.imbalanced.is_empty() {
        print_hint(&format!(
            "All labels at or above {} of the corpus.",
            format_probability(threshold as f32)
        ));
    } else {
        let labels: Vec<&str> = report.stats.imbalanced.iter().map(|l| l.as_str()).collect();
        print_warning(&format!(
            "Imbalanced labels (under {}): {}",
            format_probability(threshold as f32),
            labels.join(", ")
        ));
    }

    Ok(())
}
