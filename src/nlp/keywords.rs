//! Embedding-ranked keyword extraction.
//!
//! Candidates are the distinct non-stop-words of the document. The document and
//! every candidate are embedded, and candidates are ranked by cosine similarity
//! to the document vector.

use std::collections::BTreeSet;

use anyhow::Result;

use super::embedding::{cosine_similarity, EmbeddingProvider};
use super::{stopwords, words, KeywordExtractor};

pub struct EmbeddingKeywordExtractor {
    embedder: Box<dyn EmbeddingProvider>,
}

impl EmbeddingKeywordExtractor {
    pub fn new(embedder: Box<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }
}

/// Distinct lowercase candidate words in alphabetical order.
pub fn candidates(text: &str) -> Vec<String> {
    words(text)
        .filter(|w| !stopwords::is_stopword(w))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl KeywordExtractor for EmbeddingKeywordExtractor {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<(String, f32)>> {
        let candidates = candidates(text);
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let doc = self.embedder.embed(text)?;
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed_batch(&refs)?;
        anyhow::ensure!(
            vectors.len() == candidates.len(),
            "embedder returned {} vectors for {} candidates",
            vectors.len(),
            candidates.len()
        );

        let mut scored: Vec<(String, f32)> = candidates
            .into_iter()
            .zip(vectors.iter())
            .map(|(word, v)| (word, cosine_similarity(&doc, v)))
            .collect();
        // Stable sort: equal scores stay alphabetical.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        tracing::debug!(keywords = scored.len(), "keywords extracted");
        Ok(scored)
    }
}
