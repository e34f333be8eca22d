//! Shared ONNX Runtime plumbing for the local models.
//!
//! Session and tokenizer loading, `config.json` parsing, and a single-output
//! inference helper used by the encoder-style models (classifier, token
//! classifier, sentence embedder, seq2seq encoder).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::{Encoding, Tokenizer};

/// The subset of a Hugging Face `config.json` the local models read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub decoder_start_token_id: Option<i64>,
    #[serde(default)]
    pub forced_bos_token_id: Option<i64>,
    #[serde(default)]
    pub eos_token_id: Option<i64>,
}

impl ModelConfig {
    pub fn label(&self, index: usize) -> Option<&str> {
        self.id2label.get(&index.to_string()).map(String::as_str)
    }

    /// BERT-family exports take a `token_type_ids` input; RoBERTa/DistilBERT/BART do not.
    pub fn uses_token_type_ids(&self) -> bool {
        matches!(self.model_type.as_str(), "bert" | "electra" | "albert")
    }
}

/// Flat `i64` input tensors for a padded batch.
#[derive(Debug, Clone)]
pub struct EncodedBatch {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub batch_size: usize,
    pub seq_len: usize,
}

impl EncodedBatch {
    /// Encodings must share one length (padding enabled, or a single input).
    pub fn from_encodings(encodings: &[Encoding]) -> Self {
        let batch_size = encodings.len();
        let seq_len = encodings.first().map_or(0, |e| e.get_ids().len());

        let mut input_ids = Vec::with_capacity(batch_size * seq_len);
        let mut attention_mask = Vec::with_capacity(batch_size * seq_len);
        for encoding in encodings {
            input_ids.extend(encoding.get_ids().iter().map(|&id| id as i64));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
        }

        Self {
            input_ids,
            attention_mask,
            batch_size,
            seq_len,
        }
    }

    pub fn shape(&self) -> Vec<i64> {
        vec![self.batch_size as i64, self.seq_len as i64]
    }
}

/// A copied-out `f32` output tensor.
#[derive(Debug, Clone)]
pub struct TensorData {
    pub shape: Vec<i64>,
    pub data: Vec<f32>,
}

pub fn require_file(path: &Path) -> Result<()> {
    anyhow::ensure!(
        path.exists(),
        "model file not found at {}. Run `memlens model download` first.",
        path.display()
    );
    Ok(())
}

pub fn load_session(path: &Path) -> Result<Session> {
    require_file(path)?;
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(4)?
        .commit_from_file(path)
        .with_context(|| format!("failed to load ONNX model {}", path.display()))?;
    tracing::info!(model = %path.display(), "ONNX model loaded");
    Ok(session)
}

/// Load `tokenizer.json` with truncation at `max_len`; `pad` enables batch-longest padding.
pub fn load_tokenizer(path: &Path, max_len: usize, pad: bool) -> Result<Tokenizer> {
    require_file(path)?;
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {e}"))?;

    tokenizer
        .with_truncation(Some(tokenizers::TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("failed to set truncation: {e}"))?;

    if pad {
        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            strategy: tokenizers::PaddingStrategy::BatchLongest,
            ..Default::default()
        }));
    }

    tracing::info!(tokenizer = %path.display(), "tokenizer loaded");
    Ok(tokenizer)
}

pub fn load_model_config(path: &Path) -> Result<ModelConfig> {
    require_file(path)?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Run an encoder-style model and copy out the first output found in `output_names`
/// (falling back to output 0).
pub fn run_encoder(
    session: &Mutex<Session>,
    batch: &EncodedBatch,
    token_type_ids: bool,
    output_names: &[&str],
) -> Result<TensorData> {
    let shape = batch.shape();
    let input_ids = Tensor::from_array((shape.clone(), batch.input_ids.clone().into_boxed_slice()))?;
    let attention_mask =
        Tensor::from_array((shape.clone(), batch.attention_mask.clone().into_boxed_slice()))?;

    let mut session = session
        .lock()
        .map_err(|e| anyhow::anyhow!("session lock poisoned: {e}"))?;

    let outputs = if token_type_ids {
        // Single-segment input: all zeros.
        let zeros = vec![0i64; batch.batch_size * batch.seq_len];
        let token_type_ids = Tensor::from_array((shape, zeros.into_boxed_slice()))?;
        session.run(ort::inputs! {
            "input_ids" => input_ids,
            "attention_mask" => attention_mask,
            "token_type_ids" => token_type_ids,
        })?
    } else {
        session.run(ort::inputs! {
            "input_ids" => input_ids,
            "attention_mask" => attention_mask,
        })?
    };

    let value = output_names
        .iter()
        .find_map(|name| outputs.get(*name))
        .unwrap_or_else(|| &outputs[0]);

    let (shape, data) = value
        .try_extract_tensor::<f32>()
        .context("failed to extract output tensor")?;
    let dims: &[i64] = &shape;

    Ok(TensorData {
        shape: dims.to_vec(),
        data: data.to_vec(),
    })
}

/// Index of the largest value; `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
