#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use chrono::NaiveDateTime;
use memlens::journal::store::EntryStore;
use memlens::journal::types::{parse_timestamp, Entry};
use memlens::nlp::{EmotionClassifier, KeywordExtractor, Summarizer};
use tempfile::TempDir;

/// A store in a fresh temp directory. Keep the `TempDir` alive for the test.
pub fn temp_store() -> (TempDir, EntryStore) {
    let tmp = TempDir::new().unwrap();
    let store = EntryStore::open(tmp.path().join("entries.json")).unwrap();
    (tmp, store)
}

pub fn at(ts: &str) -> NaiveDateTime {
    parse_timestamp(ts).unwrap()
}

pub fn entry(ts: &str, text: &str, emotion: &str) -> Entry {
    Entry {
        timestamp: ts.to_string(),
        entry: text.to_string(),
        emotion: emotion.to_string(),
        summary: format!("About {emotion}."),
    }
}

/// Always answers with the same label and counts its calls.
pub struct FixedEmotion {
    pub label: String,
    pub calls: AtomicUsize,
}

impl FixedEmotion {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmotionClassifier for FixedEmotion {
    fn classify(&self, _text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.label.clone())
    }
}

/// Summarizes by keeping the first `max_words` words.
pub struct TruncatingSummarizer {
    pub max_words: usize,
}

impl Summarizer for TruncatingSummarizer {
    fn summarize(&self, text: &str) -> Result<String> {
        Ok(text
            .split_whitespace()
            .take(self.max_words)
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// A collaborator that always fails.
pub struct Failing;

impl EmotionClassifier for Failing {
    fn classify(&self, _text: &str) -> Result<String> {
        anyhow::bail!("classifier offline")
    }
}

impl Summarizer for Failing {
    fn summarize(&self, _text: &str) -> Result<String> {
        anyhow::bail!("summarizer offline")
    }
}

impl KeywordExtractor for Failing {
    fn extract(&self, _text: &str, _top_n: usize) -> Result<Vec<(String, f32)>> {
        anyhow::bail!("keyword model offline")
    }
}

/// Ranks words by how often they occur, alphabetical on ties.
pub struct CountingKeywords;

impl KeywordExtractor for CountingKeywords {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<(String, f32)>> {
        let mut counts = std::collections::BTreeMap::new();
        for word in memlens::nlp::words(text) {
            if !memlens::nlp::stopwords::is_stopword(&word) {
                *counts.entry(word).or_insert(0usize) += 1;
            }
        }
        let mut ranked: Vec<(String, f32)> =
            counts.into_iter().map(|(w, c)| (w, c as f32)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_n);
        Ok(ranked)
    }
}
