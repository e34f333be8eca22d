use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::journal::types::DEFAULT_EMOTION_ORDER;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemlensConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub models: ModelsConfig,
    pub summary: SummaryConfig,
    pub insights: InsightsConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub entries_path: String,
}

/// Where the ONNX models live and which Hugging Face repos they come from.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelsConfig {
    pub cache_dir: String,
    pub emotion_repo: String,
    pub summarizer_repo: String,
    pub embedding_repo: String,
    pub entity_repo: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SummaryConfig {
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub no_repeat_ngram: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InsightsConfig {
    pub digest_days: i64,
    pub digest_keywords: usize,
    pub entry_keywords: usize,
    pub top_words: usize,
    /// Valence axis used by the emotion trajectory, most negative first.
    pub emotion_order: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub title: String,
    pub card_width: u32,
    pub card_height: u32,
}

impl Default for MemlensConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            storage: StorageConfig::default(),
            models: ModelsConfig::default(),
            summary: SummaryConfig::default(),
            insights: InsightsConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let entries_path = default_memlens_dir()
            .join("entries.json")
            .to_string_lossy()
            .into_owned();
        Self { entries_path }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let cache_dir = default_memlens_dir()
            .join("models")
            .to_string_lossy()
            .into_owned();
        Self {
            cache_dir,
            emotion_repo: "j-hartmann/emotion-english-distilroberta-base".into(),
            summarizer_repo: "Xenova/distilbart-cnn-6-6".into(),
            embedding_repo: "sentence-transformers/all-MiniLM-L6-v2".into(),
            entity_repo: "Xenova/bert-base-NER".into(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_tokens: 10,
            max_tokens: 50,
            no_repeat_ngram: 3,
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            digest_days: 7,
            digest_keywords: 5,
            entry_keywords: 3,
            top_words: 20,
            emotion_order: DEFAULT_EMOTION_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "Memory Lens Journal".into(),
            card_width: 800,
            card_height: 400,
        }
    }
}

/// Returns `~/.memlens/`
pub fn default_memlens_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".memlens")
}

/// Returns the default config file path: `~/.memlens/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memlens_dir().join("config.toml")
}

impl MemlensConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MemlensConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.insights.digest_days >= 0,
            "insights.digest_days must not be negative (got {})",
            self.insights.digest_days
        );
        Ok(())
    }

    /// Apply environment variable overrides (MEMLENS_DATA, MEMLENS_MODELS, MEMLENS_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEMLENS_DATA") {
            self.storage.entries_path = val;
        }
        if let Ok(val) = std::env::var("MEMLENS_MODELS") {
            self.models.cache_dir = val;
        }
        if let Ok(val) = std::env::var("MEMLENS_LOG_LEVEL") {
            self.general.log_level = val;
        }
    }

    /// Resolve the entries file path, expanding `~` if needed.
    pub fn resolved_entries_path(&self) -> PathBuf {
        expand_tilde(&self.storage.entries_path)
    }

    /// Resolve the model cache directory, expanding `~` if needed.
    pub fn resolved_models_dir(&self) -> PathBuf {
        expand_tilde(&self.models.cache_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
