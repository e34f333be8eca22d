//! Display filters over the entry collection.
//!
//! Keyword, emotion, and date range filters combine by conjunction and always
//! return a new `Vec`; the loaded collection is never modified.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::NaiveDate;

use crate::journal::types::Entry;

/// Emotion filter value meaning "no emotion restriction".
pub const ALL_EMOTIONS: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Case-insensitive substring of the entry text. Empty means no filtering.
    pub keyword: Option<String>,
    /// Exact emotion label, or [`ALL_EMOTIONS`].
    pub emotion: Option<String>,
    /// Inclusive `(from, to)` date bounds.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl EntryFilter {
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    pub fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some((from, to));
        self
    }

    /// Entries matching every active filter, in input order.
    ///
    /// The date range only applies when the collection covers more than one
    /// distinct date; a single-date journal always shows everything.
    pub fn apply(&self, entries: &[Entry]) -> Result<Vec<Entry>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let keyword = self
            .keyword
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase);
        let emotion = self.emotion.as_deref().filter(|e| *e != ALL_EMOTIONS);
        let range = match self.date_range {
            Some(range) if spans_multiple_dates(entries)? => Some(range),
            _ => None,
        };

        let mut out = Vec::new();
        for entry in entries {
            if let Some(ref k) = keyword {
                if !entry.entry.to_lowercase().contains(k.as_str()) {
                    continue;
                }
            }
            if let Some(e) = emotion {
                if entry.emotion != e {
                    continue;
                }
            }
            if let Some((from, to)) = range {
                let date = entry.date()?;
                if date < from || date > to {
                    continue;
                }
            }
            out.push(entry.clone());
        }

        tracing::debug!(total = entries.len(), matched = out.len(), "filter applied");
        Ok(out)
    }
}

/// Earliest and latest entry dates, or `None` for an empty collection.
pub fn date_span(entries: &[Entry]) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let mut span: Option<(NaiveDate, NaiveDate)> = None;
    for entry in entries {
        let date = entry.date()?;
        span = Some(match span {
            Some((lo, hi)) => (lo.min(date), hi.max(date)),
            None => (date, date),
        });
    }
    Ok(span)
}

fn spans_multiple_dates(entries: &[Entry]) -> Result<bool> {
    Ok(matches!(date_span(entries)?, Some((lo, hi)) if lo < hi))
}

/// Choices for the emotion filter: `"All"` then every label present, sorted.
pub fn emotion_options(entries: &[Entry]) -> Vec<String> {
    let labels: BTreeSet<&str> = entries.iter().map(|e| e.emotion.as_str()).collect();
    std::iter::once(ALL_EMOTIONS)
        .chain(labels)
        .map(str::to_string)
        .collect()
}
