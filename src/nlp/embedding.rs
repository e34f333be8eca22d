//! Local sentence embedder.
//!
//! Implements [`EmbeddingProvider`] with an all-MiniLM-L6-v2 ONNX export.
//! Handles tokenization, inference, mean pooling, and L2 normalization. The
//! keyword extractor ranks candidate words with these vectors.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use ort::session::Session;
use tokenizers::Tokenizer;

use super::onnx::{self, EncodedBatch};

/// Maximum sequence length for all-MiniLM-L6-v2 (trained at 256).
const MAX_SEQ_LEN: usize = 256;

/// Trait for embedding text into vectors.
///
/// Implementations produce L2-normalized vectors of one fixed dimension.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut results = self.embed_batch(&[text])?;
        anyhow::ensure!(results.len() == 1, "embedder returned {} vectors for one input", results.len());
        Ok(results.remove(0))
    }

    /// Embed a batch of text strings.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Local ONNX-based sentence embedder.
pub struct LocalEmbeddingProvider {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    token_type_ids: bool,
}

impl LocalEmbeddingProvider {
    /// Load `model.onnx` and `tokenizer.json` from `dir`.
    pub fn new(dir: &Path) -> Result<Self> {
        let session = onnx::load_session(&dir.join("model.onnx"))?;
        let tokenizer = onnx::load_tokenizer(&dir.join("tokenizer.json"), MAX_SEQ_LEN, true)?;
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            // MiniLM is a BERT export and expects token_type_ids.
            token_type_ids: true,
        })
    }
}

impl EmbeddingProvider for LocalEmbeddingProvider {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))?;
        let batch = EncodedBatch::from_encodings(&encodings);

        let output = onnx::run_encoder(
            &self.session,
            &batch,
            self.token_type_ids,
            &["token_embeddings", "last_hidden_state"],
        )?;

        // Token embeddings: [batch, seq_len, hidden]
        let dims = &output.shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] as usize == batch.batch_size,
            "unexpected token_embeddings shape: {dims:?}, expected [batch, seq, hidden]"
        );
        let actual_seq_len = dims[1] as usize;
        let hidden_dim = dims[2] as usize;

        Ok(mean_pool(
            &output.data,
            &batch.attention_mask,
            batch.batch_size,
            batch.seq_len,
            actual_seq_len,
            hidden_dim,
        ))
    }
}

/// Mean-pool token vectors under the attention mask, then L2-normalize each row.
fn mean_pool(
    data: &[f32],
    attention_mask: &[i64],
    batch_size: usize,
    seq_len: usize,
    actual_seq_len: usize,
    hidden_dim: usize,
) -> Vec<Vec<f32>> {
    let mut results = Vec::with_capacity(batch_size);
    for b in 0..batch_size {
        let mut sum = vec![0.0f32; hidden_dim];
        let mut count = 0.0f32;

        for s in 0..actual_seq_len.min(seq_len) {
            let mask = attention_mask[b * seq_len + s] as f32;
            if mask > 0.0 {
                let offset = (b * actual_seq_len + s) * hidden_dim;
                for d in 0..hidden_dim {
                    sum[d] += data[offset + d] * mask;
                }
                count += mask;
            }
        }

        if count > 0.0 {
            for v in &mut sum {
                *v /= count;
            }
        }

        results.push(l2_normalize(&sum));
    }
    results
}

/// L2-normalize a vector. Returns a zero vector if the input norm is zero.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}

/// Cosine similarity; 0.0 when either vector is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
