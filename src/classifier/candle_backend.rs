//! Candle-based inference backend for fine-tuned emotion classifiers.
//!
//! Pure-Rust ML runtime using candle with Metal GPU acceleration on macOS.
//! Loads BERT or RoBERTa sequence-classification checkpoints (safetensors)
//! from a local directory or the HuggingFace Hub and produces softmax
//! distributions over the checkpoint's labels.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::xlm_roberta::{
    Config as XLMRobertaConfig, XLMRobertaForSequenceClassification,
};
use tokenizers::decoders::DecoderWrapper;
use tokenizers::models::bpe::BPE;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::models::ModelWrapper;
use tokenizers::normalizers::{BertNormalizer, NormalizerWrapper};
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::pre_tokenizers::byte_level::ByteLevel;
use tokenizers::pre_tokenizers::PreTokenizerWrapper;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::processors::roberta::RobertaProcessing;
use tokenizers::processors::PostProcessorWrapper;
use tokenizers::{
    Model, PaddingParams, PaddingStrategy, Tokenizer, TokenizerBuilder, TruncationParams,
};

use crate::classifier::EmotionClassifier;
use crate::config::{ClassifierConfig, ModelArchitecture, ModelSource};
use crate::JarError;

/// Tokenizer files found for a checkpoint.
///
/// Checkpoints saved with a slow tokenizer ship only vocabulary files, so
/// the fast tokenizer is rebuilt from them.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenizerFiles {
    /// Serialized fast tokenizer (`tokenizer.json`).
    Json(PathBuf),
    /// BERT WordPiece vocabulary (`vocab.txt`).
    WordPiece { vocab: PathBuf, dir: PathBuf },
    /// RoBERTa byte-level BPE (`vocab.json` + `merges.txt`).
    Bpe { vocab: PathBuf, merges: PathBuf },
}

impl TokenizerFiles {
    /// Find the tokenizer files in `dir`, preferring `tokenizer.json`.
    pub fn locate(dir: &Path) -> Result<Self> {
        let json = dir.join("tokenizer.json");
        if json.exists() {
            return Ok(Self::Json(json));
        }
        let vocab_txt = dir.join("vocab.txt");
        if vocab_txt.exists() {
            return Ok(Self::WordPiece {
                vocab: vocab_txt,
                dir: dir.to_path_buf(),
            });
        }
        let vocab_json = dir.join("vocab.json");
        let merges = dir.join("merges.txt");
        if vocab_json.exists() && merges.exists() {
            return Ok(Self::Bpe {
                vocab: vocab_json,
                merges,
            });
        }
        anyhow::bail!(
            "No tokenizer.json, vocab.txt or vocab.json with merges.txt in {}",
            dir.display()
        )
    }

    /// Load or rebuild the tokenizer.
    pub fn load(&self) -> Result<Tokenizer> {
        match self {
            Self::Json(path) => Tokenizer::from_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to load tokenizer.json: {}", e)),
            Self::WordPiece { vocab, dir } => wordpiece_tokenizer(vocab, lowercase_setting(dir)),
            Self::Bpe { vocab, merges } => bpe_tokenizer(vocab, merges),
        }
    }
}

/// Paths to model files on disk.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config_path: PathBuf,
    pub tokenizer: TokenizerFiles,
    pub weights_path: PathBuf,
}

type TokenizerParts = TokenizerBuilder<
    ModelWrapper,
    NormalizerWrapper,
    PreTokenizerWrapper,
    PostProcessorWrapper,
    DecoderWrapper,
>;

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("Non UTF-8 tokenizer path: {}", path.display()))
}

/// `do_lower_case` from `tokenizer_config.json`; uncased when absent.
fn lowercase_setting(dir: &Path) -> bool {
    std::fs::read_to_string(dir.join("tokenizer_config.json"))
        .ok()
        .and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).ok())
        .and_then(|config| config.get("do_lower_case").and_then(|v| v.as_bool()))
        .unwrap_or(true)
}

fn special_token(model: &impl Model, token: &str) -> Result<(String, u32)> {
    let id = model
        .token_to_id(token)
        .with_context(|| format!("Vocabulary has no {} token", token))?;
    Ok((token.to_string(), id))
}

/// Rebuild a BERT tokenizer from `vocab.txt`.
fn wordpiece_tokenizer(vocab: &Path, lowercase: bool) -> Result<Tokenizer> {
    let model = WordPiece::from_file(path_str(vocab)?)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to read vocab.txt: {}", e))?;
    let sep = special_token(&model, "[SEP]")?;
    let cls = special_token(&model, "[CLS]")?;

    let tokenizer = TokenizerParts::new()
        .with_model(model.into())
        .with_normalizer(Some(BertNormalizer::new(true, true, None, lowercase).into()))
        .with_pre_tokenizer(Some(BertPreTokenizer.into()))
        .with_post_processor(Some(BertProcessing::new(sep, cls).into()))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build WordPiece tokenizer: {}", e))?;
    Ok(Tokenizer::from(tokenizer))
}

/// Rebuild a RoBERTa tokenizer from `vocab.json` and `merges.txt`.
fn bpe_tokenizer(vocab: &Path, merges: &Path) -> Result<Tokenizer> {
    let model = BPE::from_file(path_str(vocab)?, path_str(merges)?)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to read BPE vocabulary: {}", e))?;
    let sep = special_token(&model, "</s>")?;
    let cls = special_token(&model, "<s>")?;

    let tokenizer = TokenizerParts::new()
        .with_model(model.into())
        .with_pre_tokenizer(Some(ByteLevel::default().add_prefix_space(false).into()))
        .with_post_processor(Some(RobertaProcessing::new(sep, cls).add_prefix_space(false).into()))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build BPE tokenizer: {}", e))?;
    Ok(Tokenizer::from(tokenizer))
}

/// Padding that uses the vocabulary's own pad token.
fn padding_for(tokenizer: &Tokenizer) -> PaddingParams {
    let (pad_token, pad_id) = ["[PAD]", "<pad>"]
        .iter()
        .find_map(|token| tokenizer.token_to_id(token).map(|id| (token.to_string(), id)))
        .unwrap_or_else(|| ("[PAD]".to_string(), 0));
    PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        pad_id,
        pad_token,
        ..Default::default()
    }
}

/// Download model files from HuggingFace Hub.
///
/// Uses `hf_hub::api::sync::Api` which caches at `~/.cache/huggingface/hub/`.
/// Performs synchronous I/O.
pub fn download_model(repo_id: &str) -> Result<ModelFiles> {
    let api = hf_hub::api::sync::Api::new().context("Failed to initialize HuggingFace Hub API")?;
    let repo = api.model(repo_id.to_string());

    let config_path = repo
        .get("config.json")
        .context("Failed to download config.json")?;
    let tokenizer = repo
        .get("tokenizer.json")
        .map(TokenizerFiles::Json)
        .context("Failed to download tokenizer.json")?;
    let weights_path = repo
        .get("model.safetensors")
        .context("Failed to download model.safetensors")?;

    Ok(ModelFiles {
        config_path,
        tokenizer,
        weights_path,
    })
}

/// Resolve model files from a local checkpoint directory.
///
/// The tokenizer may live in a separate directory, as produced by saving
/// model and tokenizer independently.
pub fn local_model_files(model_dir: &Path, tokenizer_dir: Option<&Path>) -> Result<ModelFiles> {
    let config_path = model_dir.join("config.json");
    let weights_path = model_dir.join("model.safetensors");
    for path in [&config_path, &weights_path] {
        if !path.exists() {
            anyhow::bail!("Missing model file: {}", path.display());
        }
    }

    let tokenizer = TokenizerFiles::locate(tokenizer_dir.unwrap_or(model_dir))?;
    Ok(ModelFiles {
        config_path,
        tokenizer,
        weights_path,
    })
}

/// Select the best available compute device.
///
/// Tries Metal (macOS) or CUDA (Linux/Windows) if the corresponding feature
/// is enabled. Probes layer-norm support since BERT/RoBERTa require it and
/// falls back to CPU if the GPU backend lacks the kernel.
pub fn select_device() -> Device {
    #[cfg(target_os = "macos")]
    {
        if let Ok(device) = Device::new_metal(0) {
            if probe_layer_norm(&device) {
                tracing::info!("Using Metal GPU for inference");
                return device;
            }
            tracing::warn!("Metal GPU available but layer-norm not supported, falling back to CPU");
        }
    }
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            if probe_layer_norm(&device) {
                tracing::info!("Using CUDA GPU for inference");
                return device;
            }
            tracing::warn!("CUDA GPU available but layer-norm not supported, falling back to CPU");
        }
    }
    tracing::info!("Using CPU for inference");
    Device::Cpu
}

/// Probe whether a device supports layer-norm (required by BERT/RoBERTa).
#[cfg(any(target_os = "macos", feature = "cuda"))]
fn probe_layer_norm(device: &Device) -> bool {
    (|| -> candle_core::Result<()> {
        let weight = Tensor::ones(4, DType::F32, device)?;
        let bias = Tensor::zeros(4, DType::F32, device)?;
        let ln = candle_nn::LayerNorm::new(weight, bias, 1e-5);
        let input = Tensor::randn(0f32, 1.0, (1, 4), device)?;
        let _ = ln.forward(&input)?;
        Ok(())
    })()
    .is_ok()
}

/// Read `model_type` from config.json.
fn detect_architecture(config_json: &serde_json::Value) -> Result<ModelArchitecture> {
    let model_type = config_json
        .get("model_type")
        .and_then(|v| v.as_str())
        .context("config.json missing model_type; set `architecture` explicitly")?;

    match model_type {
        "bert" => Ok(ModelArchitecture::Bert),
        "roberta" | "xlm-roberta" => Ok(ModelArchitecture::Roberta),
        other => anyhow::bail!("Unsupported model_type '{}'", other),
    }
}

/// Ordered label names from `id2label`: `{"0": "anger", "1": "fear", ...}`.
fn labels_from_id2label(config_json: &serde_json::Value) -> Result<Vec<String>> {
    let id2label = config_json
        .get("id2label")
        .and_then(|v| v.as_object())
        .context("config.json missing id2label mapping")?;

    let mut label_entries: Vec<(usize, String)> = id2label
        .iter()
        .filter_map(|(k, v)| {
            let idx: usize = k.parse().ok()?;
            let label = v.as_str()?.to_string();
            Some((idx, label))
        })
        .collect();
    label_entries.sort_by_key(|(idx, _)| *idx);
    Ok(label_entries.into_iter().map(|(_, label)| label).collect())
}

enum ClassifierHead {
    /// BERT encoder, pooler (dense + tanh over `[CLS]`) and linear classifier.
    Bert {
        model: BertModel,
        pooler: Linear,
        classifier: Linear,
    },
    Roberta(XLMRobertaForSequenceClassification),
}

/// Single-label sequence classifier with a softmax head.
///
/// Compatible with `BertForSequenceClassification` and
/// `RobertaForSequenceClassification` checkpoints.
pub struct SequenceClassifier {
    head: ClassifierHead,
    tokenizer: Tokenizer,
    device: Device,
    labels: Vec<String>,
}

impl SequenceClassifier {
    /// Load a classifier from model files.
    ///
    /// `labels` overrides `id2label`, which is often generic (`LABEL_0`...)
    /// for checkpoints fine-tuned without label names.
    pub fn new(
        files: &ModelFiles,
        device: Device,
        architecture: Option<ModelArchitecture>,
        labels: Option<Vec<String>>,
        max_length: usize,
    ) -> Result<Self> {
        let config_str = std::fs::read_to_string(&files.config_path)
            .context("Failed to read classifier config")?;
        let config_json: serde_json::Value =
            serde_json::from_str(&config_str).context("Failed to parse config as JSON")?;

        let architecture = match architecture {
            Some(arch) => arch,
            None => detect_architecture(&config_json)?,
        };
        let labels = match labels {
            Some(labels) => labels,
            None => labels_from_id2label(&config_json)?,
        };
        let num_labels = labels.len();
        if num_labels == 0 {
            anyhow::bail!("No labels configured and id2label is empty");
        }

        let mut tokenizer = files
            .tokenizer
            .load()
            .context("Failed to load classifier tokenizer")?;

        let padding = padding_for(&tokenizer);
        tokenizer.with_padding(Some(padding));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        // SAFETY: mmap'd safetensors file; safe as long as the file is not modified
        // while the model is in use.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights_path], DType::F32, &device)
                .context("Failed to load classifier weights")?
        };

        let head = match architecture {
            ModelArchitecture::Bert => {
                let config: BertConfig =
                    serde_json::from_str(&config_str).context("Failed to parse BERT config")?;
                let pooler = candle_nn::linear(
                    config.hidden_size,
                    config.hidden_size,
                    vb.pp("bert").pp("pooler").pp("dense"),
                )
                .context("Failed to load bert.pooler.dense")?;
                let classifier =
                    candle_nn::linear(config.hidden_size, num_labels, vb.pp("classifier"))
                        .context("Failed to load classifier head")?;
                let model = BertModel::load(vb.pp("bert"), &config)
                    .context("Failed to construct BERT model")?;
                ClassifierHead::Bert {
                    model,
                    pooler,
                    classifier,
                }
            }
            ModelArchitecture::Roberta => {
                let config: XLMRobertaConfig = serde_json::from_str(&config_str)
                    .context("Failed to parse RoBERTa config")?;
                let model = XLMRobertaForSequenceClassification::new(num_labels, &config, vb)
                    .context("Failed to construct RoBERTa model")?;
                ClassifierHead::Roberta(model)
            }
        };

        Ok(Self {
            head,
            tokenizer,
            device,
            labels,
        })
    }

    /// Classify texts into softmax distributions over [`labels`](Self::labels).
    pub fn classify(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let str_refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let encodings = self
            .tokenizer
            .encode_batch(str_refs, true)
            .map_err(|e| anyhow::anyhow!("Classifier tokenization failed: {}", e))?;

        let batch_size = encodings.len();
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let input_ids: Vec<u32> = encodings
            .iter()
            .flat_map(|e| e.get_ids().to_vec())
            .collect();
        let attention_mask: Vec<u32> = encodings
            .iter()
            .flat_map(|e| e.get_attention_mask().to_vec())
            .collect();

        let input_ids = Tensor::from_vec(input_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(attention_mask, (batch_size, max_len), &self.device)?;
        // Single-segment input: token_type_ids are all zero for both heads
        let token_type_ids = input_ids.zeros_like()?;

        // Forward pass -> [batch, num_labels] logits
        let logits = match &self.head {
            ClassifierHead::Bert {
                model,
                pooler,
                classifier,
            } => {
                let hidden = model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
                let cls = hidden.narrow(1, 0, 1)?.squeeze(1)?;
                let pooled = pooler.forward(&cls)?.tanh()?;
                classifier.forward(&pooled)?
            }
            ClassifierHead::Roberta(model) => {
                model.forward(&input_ids, &attention_mask, &token_type_ids)?
            }
        };

        let probs = candle_nn::ops::softmax(&logits, 1)?;
        probs
            .to_vec2::<f32>()
            .context("Failed to convert probabilities to Vec")
    }

    /// Label names in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }
}

/// [`EmotionClassifier`] backed by a local candle [`SequenceClassifier`].
pub struct CandleEmotionClassifier {
    name: String,
    classifier: Arc<SequenceClassifier>,
}

impl CandleEmotionClassifier {
    /// Resolve files and load the model described by `config`.
    ///
    /// Synchronous and slow; run during startup.
    pub fn load(config: &ClassifierConfig, base_dir: &Path) -> Result<Self> {
        let files = match &config.source {
            ModelSource::Local {
                model_dir,
                tokenizer_dir,
            } => {
                let model_dir = base_dir.join(model_dir);
                let tokenizer_dir = tokenizer_dir.as_ref().map(|d| base_dir.join(d));
                local_model_files(&model_dir, tokenizer_dir.as_deref())?
            }
            ModelSource::Hub { repo } => download_model(repo)?,
        };

        let device = select_device();
        let classifier = SequenceClassifier::new(
            &files,
            device,
            config.architecture,
            config.labels.clone(),
            config.max_length,
        )
        .with_context(|| format!("Failed to load classifier '{}'", config.name))?;

        tracing::info!(
            "Classifier '{}' loaded ({} labels via candle)",
            config.name,
            classifier.num_labels()
        );

        Ok(Self {
            name: config.name.clone(),
            classifier: Arc::new(classifier),
        })
    }
}

#[async_trait]
impl EmotionClassifier for CandleEmotionClassifier {
    fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    async fn classify(&self, text: &str) -> Result<Vec<f32>, JarError> {
        let classifier = self.classifier.clone();
        let text_owned = text.to_string();

        let result = tokio::task::spawn_blocking(move || classifier.classify(&[text_owned]))
            .await
            .map_err(|e| {
                JarError::model_unavailable(&self.name, format!("Task join error: {}", e))
            })?
            .map_err(|e| {
                JarError::model_unavailable(&self.name, format!("Classification error: {}", e))
            })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| JarError::model_unavailable(&self.name, "Empty classification result"))
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_from_id2label_sorted_by_index() {
        let config = serde_json::json!({
            "id2label": {"2": "joy", "0": "anger", "3": "sadness", "1": "fear"}
        });
        let labels = labels_from_id2label(&config).unwrap();
        assert_eq!(labels, vec!["anger", "fear", "joy", "sadness"]);
    }

    #[test]
    fn test_labels_from_id2label_missing() {
        let config = serde_json::json!({"model_type": "bert"});
        assert!(labels_from_id2label(&config).is_err());
    }

    #[test]
    fn test_detect_architecture() {
        let bert = serde_json::json!({"model_type": "bert"});
        let roberta = serde_json::json!({"model_type": "roberta"});
        let gpt = serde_json::json!({"model_type": "gpt2"});
        assert_eq!(detect_architecture(&bert).unwrap(), ModelArchitecture::Bert);
        assert_eq!(
            detect_architecture(&roberta).unwrap(),
            ModelArchitecture::Roberta
        );
        assert!(detect_architecture(&gpt).is_err());
    }

    #[test]
    fn test_local_model_files_reports_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = local_model_files(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_local_model_files_separate_tokenizer_dir() {
        let model_dir = tempfile::TempDir::new().unwrap();
        let tok_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(model_dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(model_dir.path().join("model.safetensors"), "").unwrap();
        std::fs::write(tok_dir.path().join("tokenizer.json"), "{}").unwrap();

        let files = local_model_files(model_dir.path(), Some(tok_dir.path())).unwrap();
        assert_eq!(
            files.tokenizer,
            TokenizerFiles::Json(tok_dir.path().join("tokenizer.json"))
        );
    }

    fn write_bert_vocab(dir: &Path) {
        let vocab = [
            "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "i", "am", "so", "happy", "sad",
        ];
        std::fs::write(dir.join("vocab.txt"), vocab.join("\n")).unwrap();
        std::fs::write(dir.join("tokenizer_config.json"), r#"{"do_lower_case": true}"#).unwrap();
        std::fs::write(
            dir.join("special_tokens_map.json"),
            r#"{"cls_token": "[CLS]", "sep_token": "[SEP]", "pad_token": "[PAD]"}"#,
        )
        .unwrap();
    }

    /// Random-weight BERT checkpoint with the fine-tuned classifier layout.
    fn write_tiny_bert(dir: &Path) {
        let config = serde_json::json!({
            "model_type": "bert",
            "vocab_size": 10,
            "hidden_size": 8,
            "num_hidden_layers": 1,
            "num_attention_heads": 2,
            "intermediate_size": 16,
            "hidden_act": "gelu",
            "hidden_dropout_prob": 0.1,
            "max_position_embeddings": 32,
            "type_vocab_size": 2,
            "initializer_range": 0.02,
            "layer_norm_eps": 1e-12,
            "pad_token_id": 0,
            "id2label": {"0": "LABEL_0", "1": "LABEL_1", "2": "LABEL_2", "3": "LABEL_3"}
        });
        std::fs::write(dir.join("config.json"), config.to_string()).unwrap();

        let bert_config: BertConfig = serde_json::from_value(config).unwrap();
        let varmap = candle_nn::VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        BertModel::load(vb.pp("bert"), &bert_config).unwrap();
        candle_nn::linear(8, 8, vb.pp("bert").pp("pooler").pp("dense")).unwrap();
        candle_nn::linear(8, 4, vb.pp("classifier")).unwrap();
        varmap.save(dir.join("model.safetensors")).unwrap();
    }

    #[test]
    fn test_tokenizer_files_prefer_tokenizer_json() {
        let dir = tempfile::TempDir::new().unwrap();
        write_bert_vocab(dir.path());
        std::fs::write(dir.path().join("tokenizer.json"), "{}").unwrap();

        let files = TokenizerFiles::locate(dir.path()).unwrap();
        assert_eq!(files, TokenizerFiles::Json(dir.path().join("tokenizer.json")));
    }

    #[test]
    fn test_tokenizer_files_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("vocab.json"), "{}").unwrap();

        let err = TokenizerFiles::locate(dir.path()).unwrap_err();
        assert!(err.to_string().contains("merges.txt"));
    }

    #[test]
    fn test_local_model_files_vocab_only_tokenizer_dir() {
        let model_dir = tempfile::TempDir::new().unwrap();
        let tok_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(model_dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(model_dir.path().join("model.safetensors"), "").unwrap();
        write_bert_vocab(tok_dir.path());

        let files = local_model_files(model_dir.path(), Some(tok_dir.path())).unwrap();
        assert_eq!(
            files.tokenizer,
            TokenizerFiles::WordPiece {
                vocab: tok_dir.path().join("vocab.txt"),
                dir: tok_dir.path().to_path_buf(),
            }
        );
    }

    #[test]
    fn test_wordpiece_tokenizer_from_vocab_txt() {
        let dir = tempfile::TempDir::new().unwrap();
        write_bert_vocab(dir.path());

        let tokenizer = TokenizerFiles::locate(dir.path()).unwrap().load().unwrap();
        let encoding = tokenizer.encode("I am SO happy", true).unwrap();

        assert_eq!(
            encoding.get_tokens(),
            &["[CLS]", "i", "am", "so", "happy", "[SEP]"]
        );
        assert_eq!(encoding.get_ids(), &[2, 5, 6, 7, 8, 3]);
        assert_eq!(padding_for(&tokenizer).pad_id, 0);
    }

    #[test]
    fn test_bpe_tokenizer_from_vocab_and_merges() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("vocab.json"),
            r#"{"<s>": 0, "<pad>": 1, "</s>": 2, "<unk>": 3, "h": 4, "i": 5, "hi": 6}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("merges.txt"), "#version: 0.2\nh i\n").unwrap();

        let tokenizer = TokenizerFiles::locate(dir.path()).unwrap().load().unwrap();
        let encoding = tokenizer.encode("hi", true).unwrap();

        assert_eq!(encoding.get_tokens(), &["<s>", "hi", "</s>"]);
        let padding = padding_for(&tokenizer);
        assert_eq!(padding.pad_token, "<pad>");
        assert_eq!(padding.pad_id, 1);
    }

    #[tokio::test]
    async fn test_default_layout_with_vocab_only_tokenizer_loads() {
        let base = tempfile::TempDir::new().unwrap();
        let model_dir = base.path().join("model/emotion_bert_model_1");
        let tok_dir = base.path().join("model/emotion_bert_tokenizer_1");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::create_dir_all(&tok_dir).unwrap();
        write_tiny_bert(&model_dir);
        write_bert_vocab(&tok_dir);

        let classifier =
            CandleEmotionClassifier::load(&ClassifierConfig::default_bert(), base.path()).unwrap();

        assert!(classifier.is_available());
        assert_eq!(classifier.labels(), &["anger", "fear", "joy", "sadness"]);
        let probs = classifier.classify("i am so sad").await.unwrap();
        assert_eq!(probs.len(), 4);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-4);
    }
}
