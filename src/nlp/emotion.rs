//! Local emotion classifier: a sequence-classification ONNX export whose
//! `config.json` maps logit indices to labels (`anger`, `joy`, ...).

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use tokenizers::Tokenizer;

use super::onnx::{self, EncodedBatch, ModelConfig};
use super::EmotionClassifier;

const MAX_SEQ_LEN: usize = 512;

pub struct OnnxEmotionClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    config: ModelConfig,
}

impl OnnxEmotionClassifier {
    /// Load `model.onnx`, `tokenizer.json`, and `config.json` from `dir`.
    pub fn new(dir: &Path) -> Result<Self> {
        let config = onnx::load_model_config(&dir.join("config.json"))?;
        anyhow::ensure!(
            !config.id2label.is_empty(),
            "emotion model config has no id2label mapping"
        );
        Ok(Self {
            session: Mutex::new(onnx::load_session(&dir.join("model.onnx"))?),
            tokenizer: onnx::load_tokenizer(&dir.join("tokenizer.json"), MAX_SEQ_LEN, false)?,
            config,
        })
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&self, text: &str) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))?;
        let batch = EncodedBatch::from_encodings(&[encoding]);

        let logits = onnx::run_encoder(
            &self.session,
            &batch,
            self.config.uses_token_type_ids(),
            &["logits"],
        )?;

        let best = onnx::argmax(&logits.data).context("emotion model returned no logits")?;
        let label = self
            .config
            .label(best)
            .with_context(|| format!("no label for class index {best}"))?;
        Ok(label.to_string())
    }
}
