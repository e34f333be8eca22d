//! Aggregate statistics over the whole journal.
//!
//! Everything here is a pure function of the entries passed in plus an explicit
//! `now`. Ties are resolved deterministically: emotion counts fall back to label
//! order, modes fall back to the smallest value (earliest date, lowest hour).

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::Serialize;

use crate::config::InsightsConfig;
use crate::journal::types::{Entry, JOY};
use crate::nlp::{self, KeywordExtractor};

/// Trajectory value for labels missing from the configured order.
pub const UNKNOWN_EMOTION_INDEX: i32 = -1;

/// An entry reduced to the fields the aggregator reads, with a parsed timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub at: NaiveDateTime,
    pub emotion: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionCount {
    pub emotion: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyDigest {
    pub since: NaiveDateTime,
    pub entries: usize,
    pub emotions: BTreeMap<String, usize>,
    pub keywords: Vec<String>,
}

/// Dense date × emotion count matrix. `counts[row][col]` pairs `dates[row]` with `emotions[col]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub dates: Vec<NaiveDate>,
    pub emotions: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl Heatmap {
    pub fn get(&self, date: NaiveDate, emotion: &str) -> Option<usize> {
        let row = self.dates.iter().position(|d| *d == date)?;
        let col = self.emotions.iter().position(|e| e == emotion)?;
        Some(self.counts[row][col])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrajectoryPoint {
    pub at: NaiveDateTime,
    pub emotion: String,
    pub index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// The full insights report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total_entries: usize,
    pub emotion_counts: Vec<EmotionCount>,
    pub most_common_emotion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub happiest_day: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_hour: Option<u32>,
    pub weekly: WeeklyDigest,
    pub heatmap: Heatmap,
    pub trajectory: Vec<TrajectoryPoint>,
    pub top_words: Vec<WordCount>,
}

/// Compute every insight over `entries`. Returns `Ok(None)` for an empty journal.
pub fn compute_insights(
    entries: &[Entry],
    now: NaiveDateTime,
    config: &InsightsConfig,
    keywords: &dyn KeywordExtractor,
) -> Result<Option<Insights>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let obs = observations(entries)?;
    let emotion_counts = emotion_frequencies(&obs);
    let most_common_emotion = emotion_counts
        .first()
        .map(|c| c.emotion.clone())
        .unwrap_or_default();

    Ok(Some(Insights {
        total_entries: obs.len(),
        most_common_emotion,
        emotion_counts,
        happiest_day: happiest_day(&obs),
        active_hour: active_hour(&obs),
        weekly: weekly_digest(
            &obs,
            now,
            config.digest_days,
            config.digest_keywords,
            keywords,
        )?,
        heatmap: heatmap(&obs),
        trajectory: trajectory(&obs, &config.emotion_order),
        top_words: top_words(&obs, config.top_words),
    }))
}

/// Parse every entry and sort by timestamp (stable, so equal timestamps keep write order).
pub fn observations(entries: &[Entry]) -> Result<Vec<Observation>> {
    let mut obs = entries
        .iter()
        .map(|e| -> Result<Observation> {
            Ok(Observation {
                at: e.datetime()?,
                emotion: e.emotion.clone(),
                text: e.entry.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    obs.sort_by_key(|o| o.at);
    Ok(obs)
}

/// Entries per emotion, highest count first, label order on ties.
pub fn emotion_frequencies(obs: &[Observation]) -> Vec<EmotionCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for o in obs {
        *counts.entry(o.emotion.as_str()).or_insert(0) += 1;
    }

    let mut table: Vec<EmotionCount> = counts
        .into_iter()
        .map(|(emotion, count)| EmotionCount {
            emotion: emotion.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the lexicographic order from the BTreeMap for equal counts.
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// Most frequent date among `joy` entries.
pub fn happiest_day(obs: &[Observation]) -> Option<NaiveDate> {
    mode(obs.iter().filter(|o| o.emotion == JOY).map(|o| o.at.date()))
}

/// Most frequent hour of day across all entries.
pub fn active_hour(obs: &[Observation]) -> Option<u32> {
    mode(obs.iter().map(|o| o.at.hour()))
}

/// Emotion counts and keywords for entries written at or after `now - days`.
pub fn weekly_digest(
    obs: &[Observation],
    now: NaiveDateTime,
    days: i64,
    top_n: usize,
    extractor: &dyn KeywordExtractor,
) -> Result<WeeklyDigest> {
    anyhow::ensure!(days >= 0, "digest window must not be negative, got {days} days");
    let since = TimeDelta::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .with_context(|| format!("digest window of {days} days is out of range"))?;
    let recent: Vec<&Observation> = obs.iter().filter(|o| o.at >= since).collect();

    let mut emotions = BTreeMap::new();
    for o in &recent {
        *emotions.entry(o.emotion.clone()).or_insert(0) += 1;
    }

    let text = recent
        .iter()
        .map(|o| o.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let keywords = if text.trim().is_empty() {
        Vec::new()
    } else {
        extractor
            .extract(&text, top_n)?
            .into_iter()
            .take(top_n)
            .map(|(word, _score)| word)
            .collect()
    };

    Ok(WeeklyDigest {
        since,
        entries: recent.len(),
        emotions,
        keywords,
    })
}

/// Count entries per (date, emotion) and zero-fill the missing cells.
pub fn heatmap(obs: &[Observation]) -> Heatmap {
    let dates: Vec<NaiveDate> = obs
        .iter()
        .map(|o| o.at.date())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let emotions: Vec<String> = obs
        .iter()
        .map(|o| o.emotion.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0usize; emotions.len()]; dates.len()];
    for o in obs {
        // Both lookups succeed: the axes were built from these same observations.
        if let (Ok(row), Ok(col)) = (
            dates.binary_search(&o.at.date()),
            emotions.binary_search(&o.emotion),
        ) {
            counts[row][col] += 1;
        }
    }

    Heatmap {
        dates,
        emotions,
        counts,
    }
}

/// Map each observation's emotion to its position in `order`, or [`UNKNOWN_EMOTION_INDEX`].
pub fn trajectory(obs: &[Observation], order: &[String]) -> Vec<TrajectoryPoint> {
    obs.iter()
        .map(|o| TrajectoryPoint {
            at: o.at,
            emotion: o.emotion.clone(),
            index: order
                .iter()
                .position(|e| *e == o.emotion)
                .map_or(UNKNOWN_EMOTION_INDEX, |i| i as i32),
        })
        .collect()
}

/// Most used non-stop-words across all entries.
pub fn top_words(obs: &[Observation], limit: usize) -> Vec<WordCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for o in obs {
        for word in nlp::words(&o.text) {
            if !nlp::stopwords::is_stopword(&word) {
                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }

    let mut table: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table.truncate(limit);
    table
}

/// Most frequent value; ties go to the smallest value.
fn mode<T: Ord + Copy>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
