//! Application configuration.
//!
//! Loaded from an explicit file, `{data_path}/quranjar.toml`, or defaults,
//! then overridden by `QURANJAR_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::JarError;

/// Config file name looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "quranjar.toml";

fn default_corpus_path() -> PathBuf {
    PathBuf::from("dataset/quran_emotions.csv")
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_length() -> usize {
    128
}

fn default_weight() -> f32 {
    1.0
}

fn canonical_labels() -> Option<Vec<String>> {
    Some(
        ["anger", "fear", "joy", "sadness"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
}

/// Encoder family of a sequence-classification checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArchitecture {
    Bert,
    Roberta,
}

/// Where a classifier's files come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSource {
    /// Checkpoint directory on disk, relative paths resolve against the data path.
    Local {
        model_dir: PathBuf,
        /// Defaults to `model_dir`
        #[serde(default)]
        tokenizer_dir: Option<PathBuf>,
    },
    /// HuggingFace Hub repository id.
    Hub { repo: String },
}

/// One ensemble member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub name: String,
    pub source: ModelSource,
    /// Inferred from config.json `model_type` when absent
    #[serde(default)]
    pub architecture: Option<ModelArchitecture>,
    /// Label names in the model's output order; overrides `id2label`
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl ClassifierConfig {
    /// Fine-tuned BERT checkpoint saved next to its tokenizer.
    pub fn default_bert() -> Self {
        Self {
            name: "bert".to_string(),
            source: ModelSource::Local {
                model_dir: PathBuf::from("model/emotion_bert_model_1"),
                tokenizer_dir: Some(PathBuf::from("model/emotion_bert_tokenizer_1")),
            },
            architecture: Some(ModelArchitecture::Bert),
            labels: canonical_labels(),
            max_length: default_max_length(),
        }
    }

    /// Fine-tuned RoBERTa checkpoint saved next to its tokenizer.
    pub fn default_roberta() -> Self {
        Self {
            name: "roberta".to_string(),
            source: ModelSource::Local {
                model_dir: PathBuf::from("model/emotion_roberta_model_1"),
                tokenizer_dir: Some(PathBuf::from("model/emotion_roberta_tokenizer_1")),
            },
            architecture: Some(ModelArchitecture::Roberta),
            labels: canonical_labels(),
            max_length: default_max_length(),
        }
    }
}

/// Relative weight of each ensemble member. Equal by default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    #[serde(default = "default_weight")]
    pub model_a: f32,
    #[serde(default = "default_weight")]
    pub model_b: f32,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            model_a: default_weight(),
            model_b: default_weight(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Labeled verse CSV, relative paths resolve against the data path
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,
    /// HTTP listen address
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "ClassifierConfig::default_bert")]
    pub model_a: ClassifierConfig,
    #[serde(default = "ClassifierConfig::default_roberta")]
    pub model_b: ClassifierConfig,
    #[serde(default)]
    pub weights: EnsembleWeights,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            bind: default_bind(),
            model_a: ClassifierConfig::default_bert(),
            model_b: ClassifierConfig::default_roberta(),
            weights: EnsembleWeights::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, JarError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            JarError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `QURANJAR_CORPUS_PATH` and `QURANJAR_BIND` overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("QURANJAR_CORPUS_PATH") {
            self.corpus_path = PathBuf::from(path);
        }
        if let Ok(bind) = std::env::var("QURANJAR_BIND") {
            self.bind = bind;
        }
    }

    /// Corpus path resolved against `data_path`.
    pub fn corpus_path_in(&self, data_path: &Path) -> PathBuf {
        data_path.join(&self.corpus_path)
    }
}

/// Load config with priority:
/// 1. `explicit` file (errors are fatal)
/// 2. `{data_path}/quranjar.toml` (parse errors fall back to defaults)
/// 3. Defaults
///
/// Environment overrides are applied last.
pub fn load_config(data_path: &Path, explicit: Option<&Path>) -> Result<AppConfig, JarError> {
    let mut config = if let Some(path) = explicit {
        let config = AppConfig::from_file(path)?;
        tracing::info!("Loaded config from {}", path.display());
        config
    } else {
        let config_path = data_path.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            match AppConfig::from_file(&config_path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("{}. Using default.", e);
                    AppConfig::default()
                }
            }
        } else {
            AppConfig::default()
        }
    };

    config.apply_env_overrides();
    Ok(config)
}

/// Resolve the data directory.
///
/// Priority: explicit path > `QURANJAR_DATA_PATH` env > `./.quranjar` (if exists) > `~/.quranjar`
pub fn resolve_data_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var("QURANJAR_DATA_PATH").ok().map(PathBuf::from))
        .or_else(|| {
            let local_path = Path::new(".quranjar");
            if local_path.exists() && local_path.is_dir() {
                Some(local_path.to_path_buf())
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".quranjar"))
                .unwrap_or_else(|| PathBuf::from(".quranjar"))
        })
}
