use thiserror::Error;

/// Custom error type for QuranJar operations.
#[derive(Debug, Error)]
pub enum JarError {
    /// Request text was missing, empty or whitespace-only.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A classifier could not produce a distribution for this request.
    #[error("Model '{model}' unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    /// A classifier's label ordering cannot be mapped onto the canonical labels.
    #[error("Label ordering mismatch for model '{model}': {message}")]
    LabelOrderingMismatch { model: String, message: String },

    /// A score vector is not a categorical distribution.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// Reference corpus could not be loaded or violates the label set.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JarError {
    pub fn model_unavailable(model: impl Into<String>, message: impl Into<String>) -> Self {
        JarError::ModelUnavailable {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn label_mismatch(model: impl Into<String>, message: impl Into<String>) -> Self {
        JarError::LabelOrderingMismatch {
            model: model.into(),
            message: message.into(),
        }
    }
}

impl From<csv::Error> for JarError {
    fn from(err: csv::Error) -> Self {
        JarError::Corpus(format!("CSV error: {}", err))
    }
}

impl From<serde_json::Error> for JarError {
    fn from(err: serde_json::Error) -> Self {
        JarError::Config(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for JarError {
    fn from(err: toml::de::Error) -> Self {
        JarError::Config(format!("TOML error: {}", err))
    }
}

impl From<std::io::Error> for JarError {
    fn from(err: std::io::Error) -> Self {
        JarError::Corpus(format!("I/O error: {}", err))
    }
}
