//! Annotation pipeline and the save path.
//!
//! [`Annotator`] turns raw text into an emotion label and a summary via the
//! NLP collaborators; [`write_entry`] wraps it with the blank-text gate and the
//! store append.

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::AnnotateError;
use crate::journal::store::EntryStore;
use crate::journal::types::Entry;
use crate::nlp::{EmotionClassifier, Summarizer};

/// Emotion and summary produced for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub emotion: String,
    pub summary: String,
}

pub struct Annotator<'a> {
    emotion: &'a dyn EmotionClassifier,
    summarizer: &'a dyn Summarizer,
}

impl<'a> Annotator<'a> {
    pub fn new(emotion: &'a dyn EmotionClassifier, summarizer: &'a dyn Summarizer) -> Self {
        Self {
            emotion,
            summarizer,
        }
    }

    /// Classify and summarize non-blank `text`. Collaborator errors propagate.
    pub fn annotate(&self, text: &str) -> Result<Annotation> {
        let emotion = self.emotion.classify(text)?.trim().to_string();
        if emotion.is_empty() {
            return Err(AnnotateError::EmptyEmotion.into());
        }

        let summary = self.summarizer.summarize(text)?.trim().to_string();
        if summary.is_empty() {
            return Err(AnnotateError::EmptySummary.into());
        }

        tracing::debug!(emotion = %emotion, summary_len = summary.len(), "text annotated");
        Ok(Annotation { emotion, summary })
    }
}

/// Annotate `text` and append it to the store, stamped with `now`.
///
/// Blank text is dropped silently: no collaborator call, no write, `Ok(None)`.
pub fn write_entry(
    store: &EntryStore,
    annotator: &Annotator<'_>,
    text: &str,
    now: NaiveDateTime,
) -> Result<Option<Entry>> {
    if text.trim().is_empty() {
        tracing::debug!("blank entry ignored");
        return Ok(None);
    }

    let annotation = annotator.annotate(text)?;
    let entry = Entry::new(now, text, annotation.emotion, annotation.summary);
    store.append(&entry)?;
    Ok(Some(entry))
}
