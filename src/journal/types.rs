//! Core journal type definitions.
//!
//! Defines [`Entry`] (the single persisted record) and the timestamp helpers
//! shared by the store, aggregator, and filter engine.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::EntryError;

/// Emotion labels, ordered from the most negative to the most positive.
pub const DEFAULT_EMOTION_ORDER: [&str; 7] = [
    "neutral", "sadness", "disgust", "fear", "anger", "surprise", "joy",
];

/// Label counted for the "happiest day" insight.
pub const JOY: &str = "joy";

/// Timestamp layout written for new entries (local time, microseconds, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One journal record, matching the on-disk JSON object exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// ISO 8601 creation time.
    pub timestamp: String,
    /// Raw text as written.
    pub entry: String,
    /// Detected emotion label, e.g. `"joy"`.
    pub emotion: String,
    /// Short generated summary of `entry`.
    pub summary: String,
}

impl Entry {
    pub fn new(
        timestamp: NaiveDateTime,
        entry: impl Into<String>,
        emotion: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: format_timestamp(timestamp),
            entry: entry.into(),
            emotion: emotion.into(),
            summary: summary.into(),
        }
    }

    /// Parse `timestamp` into a naive local datetime.
    pub fn datetime(&self) -> Result<NaiveDateTime, EntryError> {
        parse_timestamp(&self.timestamp)
    }

    /// Calendar date component of `timestamp`.
    pub fn date(&self) -> Result<NaiveDate, EntryError> {
        Ok(self.datetime()?.date())
    }

    pub fn hour(&self) -> Result<u32, EntryError> {
        Ok(self.datetime()?.hour())
    }
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts `2024-01-01T10:00:00`, fractional seconds, a space separator, or
/// RFC 3339 with an offset (reduced to its local wall clock).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, EntryError> {
    let raw = raw.trim();
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_local());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }
    Err(EntryError::InvalidTimestamp {
        timestamp: raw.to_string(),
    })
}
