//! NLP collaborators.
//!
//! Defines the four contracts the journal core consumes ([`EmotionClassifier`],
//! [`Summarizer`], [`KeywordExtractor`], [`EntityRecognizer`]), their local ONNX
//! implementations, and the [`Models`] registry that builds each one at most
//! once per process.
//!
//! All methods are synchronous and blocking.

pub mod embedding;
pub mod emotion;
pub mod entities;
pub mod keywords;
pub mod onnx;
pub mod stopwords;
pub mod summarize;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{MemlensConfig, ModelsConfig, SummaryConfig};

/// Text → single best emotion label.
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<String>;
}

/// Text → short abstractive summary.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> Result<String>;
}

/// Text → up to `top_n` `(keyword, score)` pairs, best first.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<(String, f32)>>;
}

/// Text → named entities. Display only; never persisted.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    /// Entity type, e.g. `PER`, `ORG`, `LOC`.
    pub label: String,
}

/// Lowercase word tokens of at least two word characters.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_lowercase)
}

/// The local models and the files each one needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Emotion,
    Summarizer,
    Embedding,
    Entities,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Emotion,
        ModelKind::Summarizer,
        ModelKind::Embedding,
        ModelKind::Entities,
    ];

    /// Subdirectory of the model cache.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Emotion => "emotion",
            Self::Summarizer => "summarizer",
            Self::Embedding => "embedding",
            Self::Entities => "entities",
        }
    }

    /// `(path in the repo, local file name)` pairs.
    pub fn files(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Emotion | Self::Entities => &[
                ("onnx/model.onnx", "model.onnx"),
                ("tokenizer.json", "tokenizer.json"),
                ("config.json", "config.json"),
            ],
            Self::Summarizer => &[
                ("onnx/encoder_model.onnx", "encoder_model.onnx"),
                ("onnx/decoder_model.onnx", "decoder_model.onnx"),
                ("tokenizer.json", "tokenizer.json"),
                ("config.json", "config.json"),
            ],
            Self::Embedding => &[
                ("onnx/model.onnx", "model.onnx"),
                ("tokenizer.json", "tokenizer.json"),
            ],
        }
    }

    pub fn repo<'a>(&self, config: &'a ModelsConfig) -> &'a str {
        match self {
            Self::Emotion => &config.emotion_repo,
            Self::Summarizer => &config.summarizer_repo,
            Self::Embedding => &config.embedding_repo,
            Self::Entities => &config.entity_repo,
        }
    }

    pub fn url(&self, config: &ModelsConfig, remote_path: &str) -> String {
        format!(
            "https://huggingface.co/{}/resolve/main/{remote_path}",
            self.repo(config)
        )
    }

    pub fn local_dir(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(self.dir_name())
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Lazily-built, process-wide collaborators.
///
/// Each accessor loads its model on first use and returns the same instance
/// afterwards. A failed load is not cached, so the next call retries.
pub struct Models {
    cache_dir: PathBuf,
    summary: SummaryConfig,
    emotion: OnceLock<Box<dyn EmotionClassifier>>,
    summarizer: OnceLock<Box<dyn Summarizer>>,
    keywords: OnceLock<Box<dyn KeywordExtractor>>,
    entities: OnceLock<Box<dyn EntityRecognizer>>,
}

impl Models {
    pub fn new(config: &MemlensConfig) -> Self {
        Self {
            cache_dir: config.resolved_models_dir(),
            summary: config.summary.clone(),
            emotion: OnceLock::new(),
            summarizer: OnceLock::new(),
            keywords: OnceLock::new(),
            entities: OnceLock::new(),
        }
    }

    pub fn emotion(&self) -> Result<&dyn EmotionClassifier> {
        init_once(&self.emotion, || {
            let dir = ModelKind::Emotion.local_dir(&self.cache_dir);
            let model: Box<dyn EmotionClassifier> = Box::new(
                emotion::OnnxEmotionClassifier::new(&dir).context("failed to load emotion model")?,
            );
            Ok(model)
        })
    }

    pub fn summarizer(&self) -> Result<&dyn Summarizer> {
        init_once(&self.summarizer, || {
            let dir = ModelKind::Summarizer.local_dir(&self.cache_dir);
            let model: Box<dyn Summarizer> = Box::new(
                summarize::OnnxSummarizer::new(&dir, &self.summary)
                    .context("failed to load summarization model")?,
            );
            Ok(model)
        })
    }

    pub fn keywords(&self) -> Result<&dyn KeywordExtractor> {
        init_once(&self.keywords, || {
            let dir = ModelKind::Embedding.local_dir(&self.cache_dir);
            let embedder = embedding::LocalEmbeddingProvider::new(&dir)
                .context("failed to load embedding model")?;
            let model: Box<dyn KeywordExtractor> =
                Box::new(keywords::EmbeddingKeywordExtractor::new(Box::new(embedder)));
            Ok(model)
        })
    }

    pub fn entities(&self) -> Result<&dyn EntityRecognizer> {
        init_once(&self.entities, || {
            let dir = ModelKind::Entities.local_dir(&self.cache_dir);
            let model: Box<dyn EntityRecognizer> = Box::new(
                entities::OnnxEntityRecognizer::new(&dir).context("failed to load entity model")?,
            );
            Ok(model)
        })
    }

    /// Install a classifier ahead of first use, replacing any loaded one.
    pub fn with_emotion(mut self, model: Box<dyn EmotionClassifier>) -> Self {
        self.emotion = OnceLock::from(model);
        self
    }

    pub fn with_summarizer(mut self, model: Box<dyn Summarizer>) -> Self {
        self.summarizer = OnceLock::from(model);
        self
    }

    pub fn with_keywords(mut self, model: Box<dyn KeywordExtractor>) -> Self {
        self.keywords = OnceLock::from(model);
        self
    }

    pub fn with_entities(mut self, model: Box<dyn EntityRecognizer>) -> Self {
        self.entities = OnceLock::from(model);
        self
    }
}

fn init_once<'a, T: ?Sized>(
    cell: &'a OnceLock<Box<T>>,
    init: impl FnOnce() -> Result<Box<T>>,
) -> Result<&'a T> {
    if let Some(existing) = cell.get() {
        return Ok(existing.as_ref());
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value).as_ref())
}
