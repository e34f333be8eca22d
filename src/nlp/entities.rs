//! Local named-entity recognizer: a BERT token-classification ONNX export with
//! BIO labels (`B-PER`, `I-ORG`, `O`, ...) merged into character spans.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use tokenizers::Tokenizer;

use super::onnx::{self, EncodedBatch, ModelConfig};
use super::{Entity, EntityRecognizer};

const MAX_SEQ_LEN: usize = 512;

pub struct OnnxEntityRecognizer {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    config: ModelConfig,
}

impl OnnxEntityRecognizer {
    pub fn new(dir: &Path) -> Result<Self> {
        let config = onnx::load_model_config(&dir.join("config.json"))?;
        anyhow::ensure!(
            !config.id2label.is_empty(),
            "entity model config has no id2label mapping"
        );
        Ok(Self {
            session: Mutex::new(onnx::load_session(&dir.join("model.onnx"))?),
            tokenizer: onnx::load_tokenizer(&dir.join("tokenizer.json"), MAX_SEQ_LEN, false)?,
            config,
        })
    }
}

impl EntityRecognizer for OnnxEntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))?;

        let tokens: Vec<TaggedToken> = {
            let batch = EncodedBatch::from_encodings(std::slice::from_ref(&encoding));
            let logits = onnx::run_encoder(
                &self.session,
                &batch,
                self.config.uses_token_type_ids(),
                &["logits"],
            )?;
            let dims = &logits.shape;
            anyhow::ensure!(dims.len() == 3, "unexpected logits shape: {dims:?}");
            let num_labels = dims[2] as usize;

            logits
                .data
                .chunks(num_labels)
                .zip(encoding.get_offsets())
                .zip(encoding.get_word_ids())
                .zip(encoding.get_special_tokens_mask())
                .filter(|(_, special)| **special == 0)
                .map(|(((row, &offsets), &word), _)| -> Result<TaggedToken> {
                    let best = onnx::argmax(row).context("empty logits row")?;
                    Ok(TaggedToken {
                        label: self.config.label(best).unwrap_or("O").to_string(),
                        offsets,
                        word,
                    })
                })
                .collect::<Result<_>>()?
        };

        Ok(merge_spans(text, &tokens))
    }
}

/// One non-special token with its predicted BIO label.
#[derive(Debug, Clone)]
pub struct TaggedToken {
    pub label: String,
    pub offsets: (usize, usize),
    pub word: Option<u32>,
}

/// Merge BIO-tagged tokens into entities. Sub-word pieces follow their word's
/// first piece; an `I-` tag of a different type starts a new entity.
pub fn merge_spans(text: &str, tokens: &[TaggedToken]) -> Vec<Entity> {
    let mut entities = Vec::new();
    // (label, start, end, word)
    let mut current: Option<(String, usize, usize, Option<u32>)> = None;

    for token in tokens {
        let continues_word = matches!(
            (&current, token.word),
            (Some((_, _, _, Some(w))), Some(tw)) if *w == tw
        );
        if continues_word {
            if let Some(cur) = current.as_mut() {
                cur.2 = token.offsets.1;
            }
            continue;
        }

        let (tag, kind) = split_label(&token.label);
        let extends = tag == "I" && current.as_ref().is_some_and(|cur| cur.0 == kind);
        if extends {
            if let Some(cur) = current.as_mut() {
                cur.2 = token.offsets.1;
                cur.3 = token.word;
            }
        } else if tag == "B" || tag == "I" {
            flush(text, current.take(), &mut entities);
            current = Some((kind.to_string(), token.offsets.0, token.offsets.1, token.word));
        } else {
            flush(text, current.take(), &mut entities);
        }
    }
    flush(text, current, &mut entities);
    entities
}

fn split_label(label: &str) -> (&str, &str) {
    match label.split_once('-') {
        Some((tag, kind)) => (tag, kind),
        None => ("O", ""),
    }
}

fn flush(text: &str, span: Option<(String, usize, usize, Option<u32>)>, out: &mut Vec<Entity>) {
    if let Some((label, start, end, _)) = span {
        if let Some(slice) = text.get(start..end) {
            let trimmed = slice.trim();
            if !trimmed.is_empty() {
                out.push(Entity {
                    text: trimmed.to_string(),
                    label,
                });
            }
        }
    }
}
