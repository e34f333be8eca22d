//! Local abstractive summarizer.
//!
//! Runs a BART-style encoder/decoder ONNX export (`encoder_model.onnx`,
//! `decoder_model.onnx`) with greedy decoding. Generation honours a minimum and
//! maximum length (in tokens, counting the decoder start token) and blocks
//! repeated n-grams.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;

use super::onnx::{self, EncodedBatch, ModelConfig, TensorData};
use super::Summarizer;
use crate::config::SummaryConfig;

const MAX_SOURCE_LEN: usize = 1024;

/// Token ids and limits steering greedy decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeParams {
    pub decoder_start: i64,
    pub forced_bos: Option<i64>,
    pub eos: i64,
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub no_repeat_ngram: usize,
}

impl DecodeParams {
    pub fn new(config: &ModelConfig, settings: &SummaryConfig) -> Self {
        let eos = config.eos_token_id.unwrap_or(2);
        Self {
            decoder_start: config.decoder_start_token_id.unwrap_or(eos),
            forced_bos: config.forced_bos_token_id,
            eos,
            min_tokens: settings.min_tokens,
            max_tokens: settings.max_tokens.max(2),
            no_repeat_ngram: settings.no_repeat_ngram,
        }
    }
}

pub struct OnnxSummarizer {
    encoder: Mutex<Session>,
    decoder: Mutex<Session>,
    tokenizer: Tokenizer,
    params: DecodeParams,
}

impl OnnxSummarizer {
    pub fn new(dir: &Path, settings: &SummaryConfig) -> Result<Self> {
        let config = onnx::load_model_config(&dir.join("config.json"))?;
        Ok(Self {
            encoder: Mutex::new(onnx::load_session(&dir.join("encoder_model.onnx"))?),
            decoder: Mutex::new(onnx::load_session(&dir.join("decoder_model.onnx"))?),
            tokenizer: onnx::load_tokenizer(&dir.join("tokenizer.json"), MAX_SOURCE_LEN, false)?,
            params: DecodeParams::new(&config, settings),
        })
    }

    /// Logits for the next token after `generated`.
    fn decode_step(
        &self,
        generated: &[i64],
        source: &EncodedBatch,
        hidden: &TensorData,
    ) -> Result<Vec<f32>> {
        let input_ids = Tensor::from_array((
            vec![1i64, generated.len() as i64],
            generated.to_vec().into_boxed_slice(),
        ))?;
        let encoder_attention_mask = Tensor::from_array((
            source.shape(),
            source.attention_mask.clone().into_boxed_slice(),
        ))?;
        let encoder_hidden_states =
            Tensor::from_array((hidden.shape.clone(), hidden.data.clone().into_boxed_slice()))?;

        let mut decoder = self
            .decoder
            .lock()
            .map_err(|e| anyhow::anyhow!("session lock poisoned: {e}"))?;

        let outputs = decoder.run(ort::inputs! {
            "input_ids" => input_ids,
            "encoder_attention_mask" => encoder_attention_mask,
            "encoder_hidden_states" => encoder_hidden_states,
        })?;

        let value = outputs.get("logits").unwrap_or_else(|| &outputs[0]);
        let (shape, data) = value
            .try_extract_tensor::<f32>()
            .context("failed to extract decoder logits")?;
        let dims: &[i64] = &shape;
        anyhow::ensure!(dims.len() == 3, "unexpected logits shape: {dims:?}");

        let vocab = dims[2] as usize;
        let last = (dims[1] as usize).saturating_sub(1);
        Ok(data[last * vocab..(last + 1) * vocab].to_vec())
    }
}

impl Summarizer for OnnxSummarizer {
    fn summarize(&self, text: &str) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))?;
        let source = EncodedBatch::from_encodings(&[encoding]);
        let hidden = onnx::run_encoder(&self.encoder, &source, false, &["last_hidden_state"])?;

        let mut generated = vec![self.params.decoder_start];
        while generated.len() < self.params.max_tokens {
            let mut logits = self.decode_step(&generated, &source, &hidden)?;
            let next = choose_next(&mut logits, &generated, &self.params)
                .context("decoder produced no candidate token")?;
            generated.push(next);
            if next == self.params.eos {
                break;
            }
        }

        let ids: Vec<u32> = generated.iter().map(|&id| id as u32).collect();
        let summary = self
            .tokenizer
            .decode(&ids, true)
            .map_err(|e| anyhow::anyhow!("detokenization failed: {e}"))?;
        tracing::debug!(tokens = generated.len(), "summary generated");
        Ok(summary.trim().to_string())
    }
}

/// Greedy pick of the next token after applying forced BOS, minimum length, and
/// the no-repeat n-gram ban.
pub fn choose_next(logits: &mut [f32], generated: &[i64], params: &DecodeParams) -> Option<i64> {
    if generated.len() == 1 {
        if let Some(bos) = params.forced_bos {
            return Some(bos);
        }
    }

    if generated.len() < params.min_tokens {
        ban(logits, params.eos);
    }

    for token in banned_ngram_tokens(generated, params.no_repeat_ngram) {
        ban(logits, token);
    }

    let best = onnx::argmax(logits)?;
    if logits[best] == f32::NEG_INFINITY {
        return None;
    }
    Some(best as i64)
}

/// Tokens that would complete an n-gram already present in `generated`.
fn banned_ngram_tokens(generated: &[i64], n: usize) -> Vec<i64> {
    if n == 0 || generated.len() + 1 < n {
        return Vec::new();
    }
    let prefix = &generated[generated.len() + 1 - n..];
    generated
        .windows(n)
        .filter(|w| w[..n - 1] == *prefix)
        .map(|w| w[n - 1])
        .collect()
}

fn ban(logits: &mut [f32], token: i64) {
    if let Some(slot) = usize::try_from(token).ok().and_then(|i| logits.get_mut(i)) {
        *slot = f32::NEG_INFINITY;
    }
}
