mod helpers;

use chrono::NaiveDate;
use helpers::{at, entry, CountingKeywords, Failing};
use memlens::config::InsightsConfig;
use memlens::journal::insights::{
    compute_insights, emotion_frequencies, observations, trajectory, weekly_digest,
    UNKNOWN_EMOTION_INDEX,
};
use memlens::journal::types::Entry;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn journal() -> Vec<Entry> {
    vec![
        entry("2024-01-03T21:00:00", "Rainy evening, stayed in with tea", "sadness"),
        entry("2024-01-01T09:15:00", "Garden sunrise, coffee outside", "joy"),
        entry("2024-01-01T21:40:00", "Garden party with friends", "joy"),
        entry("2024-01-02T21:05:00", "Work deadline moved again", "anger"),
        entry("2024-01-05T10:00:00", "Garden looks amazing after the rain", "joy"),
    ]
}

#[test]
fn full_report_over_a_small_journal() {
    let report = compute_insights(
        &journal(),
        at("2024-01-06T12:00:00"),
        &InsightsConfig::default(),
        &CountingKeywords,
    )
    .unwrap()
    .unwrap();

    assert_eq!(report.total_entries, 5);
    assert_eq!(report.most_common_emotion, "joy");
    assert_eq!(report.emotion_counts[0].count, 3);
    assert_eq!(report.happiest_day, Some(day(2024, 1, 1)));
    assert_eq!(report.active_hour, Some(21));

    // Trajectory follows timestamp order, not write order.
    let emotions: Vec<&str> = report.trajectory.iter().map(|p| p.emotion.as_str()).collect();
    assert_eq!(emotions, vec!["joy", "joy", "anger", "sadness", "joy"]);

    assert_eq!(report.heatmap.dates.len(), 4);
    assert_eq!(report.heatmap.get(day(2024, 1, 1), "joy"), Some(2));
    assert_eq!(report.heatmap.get(day(2024, 1, 2), "joy"), Some(0));

    assert_eq!(report.top_words[0].word, "garden");
    assert_eq!(report.top_words[0].count, 3);

    assert_eq!(report.weekly.entries, 5);
    assert_eq!(report.weekly.keywords[0], "garden");
}

#[test]
fn tie_between_emotions_is_deterministic() {
    let entries = vec![
        entry("2024-01-02T10:00:00", "lost my keys", "sadness"),
        entry("2024-01-01T10:00:00", "found a coin", "joy"),
    ];
    let reversed: Vec<Entry> = entries.iter().rev().cloned().collect();

    for input in [&entries, &reversed] {
        let report = compute_insights(
            input,
            at("2024-01-03T00:00:00"),
            &InsightsConfig::default(),
            &CountingKeywords,
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.most_common_emotion, "joy");
        assert_eq!(report.emotion_counts[1].emotion, "sadness");
    }
}

#[test]
fn aggregation_is_idempotent_and_leaves_input_untouched() {
    let entries = journal();
    let snapshot = entries.clone();
    let now = at("2024-01-06T12:00:00");
    let config = InsightsConfig::default();

    let first = compute_insights(&entries, now, &config, &CountingKeywords).unwrap();
    let second = compute_insights(&entries, now, &config, &CountingKeywords).unwrap();
    assert_eq!(first, second);
    assert_eq!(entries, snapshot);
}

#[test]
fn empty_journal_short_circuits_before_models() {
    let report = compute_insights(
        &[],
        at("2024-01-06T12:00:00"),
        &InsightsConfig::default(),
        &Failing,
    )
    .unwrap();
    assert!(report.is_none());
}

#[test]
fn out_of_range_digest_window_is_an_error() {
    let obs = observations(&journal()).unwrap();
    let now = at("2024-01-06T00:00:00");

    let err = weekly_digest(&obs, now, 200_000_000, 5, &CountingKeywords).unwrap_err();
    assert!(err.to_string().contains("out of range"));
    assert!(weekly_digest(&obs, now, i64::MAX, 5, &CountingKeywords).is_err());

    let err = weekly_digest(&obs, now, -1, 5, &CountingKeywords).unwrap_err();
    assert!(err.to_string().contains("negative"));
}

#[test]
fn weekly_digest_without_recent_entries_is_empty() {
    let obs = observations(&journal()).unwrap();
    let digest = weekly_digest(&obs, at("2024-03-01T00:00:00"), 7, 5, &Failing).unwrap();

    assert_eq!(digest.entries, 0);
    assert!(digest.emotions.is_empty());
    assert!(digest.keywords.is_empty());
    assert_eq!(digest.since, at("2024-02-23T00:00:00"));
}

#[test]
fn weekly_digest_only_counts_the_window() {
    let obs = observations(&journal()).unwrap();
    let digest = weekly_digest(&obs, at("2024-01-06T00:00:00"), 2, 3, &CountingKeywords).unwrap();

    // Window starts 2024-01-04T00:00, so only the 5th entry is inside it.
    assert_eq!(digest.entries, 1);
    assert_eq!(digest.emotions.get("joy"), Some(&1));
    assert!(digest.keywords.len() <= 3);
}

#[test]
fn keyword_failure_propagates_out_of_the_report() {
    let err = compute_insights(
        &journal(),
        at("2024-01-06T12:00:00"),
        &InsightsConfig::default(),
        &Failing,
    )
    .unwrap_err();
    assert!(err.to_string().contains("keyword model offline"));
}

#[test]
fn trajectory_uses_configured_order_and_flags_unknown_labels() {
    let entries = vec![
        entry("2024-01-01T10:00:00", "a", "joy"),
        entry("2024-01-02T10:00:00", "b", "bored"),
        entry("2024-01-03T10:00:00", "c", "neutral"),
    ];
    let obs = observations(&entries).unwrap();

    let default_order = InsightsConfig::default().emotion_order;
    let points = trajectory(&obs, &default_order);
    let indices: Vec<i32> = points.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![6, UNKNOWN_EMOTION_INDEX, 0]);

    let custom = vec!["joy".to_string(), "neutral".to_string()];
    let indices: Vec<i32> = trajectory(&obs, &custom).iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, UNKNOWN_EMOTION_INDEX, 1]);
}

#[test]
fn malformed_timestamp_fails_aggregation() {
    let entries = vec![entry("not a date", "x", "joy")];
    assert!(observations(&entries).is_err());
    assert!(emotion_frequencies(&[]).is_empty());
}
