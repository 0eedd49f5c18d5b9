//! CLI interface for quranjar.

pub mod handlers;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use output::OutputMode;

/// quranjar - emotion ensemble with Quranic verse citations
#[derive(Parser)]
#[command(name = "quranjar", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ~/.quranjar)
    #[arg(long, env = "QURANJAR_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Config file (default: <data-path>/quranjar.toml)
    #[arg(long, env = "QURANJAR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP prediction server
    Serve {
        /// Listen address (overrides config `bind`)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Predict the emotion of a text and cite a verse
    Predict {
        /// Text to classify
        text: String,
    },

    /// Show the corpus class distribution
    Corpus {
        /// Share below which a label counts as imbalanced
        #[arg(long)]
        threshold: Option<f64>,
    },
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}
