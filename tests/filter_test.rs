mod helpers;

use chrono::NaiveDate;
use helpers::entry;
use memlens::journal::filter::{date_span, emotion_options, EntryFilter, ALL_EMOTIONS};
use memlens::journal::types::Entry;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn journal() -> Vec<Entry> {
    vec![
        entry("2024-01-01T09:00:00", "Morning run in the park", "joy"),
        entry("2024-01-02T18:00:00", "Park bench, felt lonely", "sadness"),
        entry("2024-01-03T12:00:00", "Lunch with Sam in the PARK", "joy"),
        entry("2024-01-04T20:00:00", "Argument about chores", "anger"),
        entry("2024-01-05T07:30:00", "Quiet coffee before work", "neutral"),
    ]
}

fn timestamps(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.timestamp.as_str()).collect()
}

#[test]
fn keyword_is_case_insensitive_substring() {
    let entries = journal();
    let matched = EntryFilter::default().keyword("park").apply(&entries).unwrap();
    assert_eq!(
        timestamps(&matched),
        vec!["2024-01-01T09:00:00", "2024-01-02T18:00:00", "2024-01-03T12:00:00"]
    );
}

#[test]
fn conjunction_is_subset_of_each_filter() {
    let entries = journal();
    let by_keyword = EntryFilter::default().keyword("park").apply(&entries).unwrap();
    let by_emotion = EntryFilter::default().emotion("joy").apply(&entries).unwrap();
    let by_range = EntryFilter::default()
        .date_range(day(2024, 1, 2), day(2024, 1, 4))
        .apply(&entries)
        .unwrap();

    let all = EntryFilter::default()
        .keyword("park")
        .emotion("joy")
        .date_range(day(2024, 1, 2), day(2024, 1, 4))
        .apply(&entries)
        .unwrap();

    assert_eq!(timestamps(&all), vec!["2024-01-03T12:00:00"]);
    for e in &all {
        assert!(by_keyword.contains(e));
        assert!(by_emotion.contains(e));
        assert!(by_range.contains(e));
    }
}

#[test]
fn all_and_empty_values_disable_their_filters() {
    let entries = journal();
    let matched = EntryFilter::default()
        .keyword("")
        .emotion(ALL_EMOTIONS)
        .apply(&entries)
        .unwrap();
    assert_eq!(matched, entries);
}

#[test]
fn range_is_inclusive_and_keeps_input_order() {
    let mut entries = journal();
    entries.reverse();
    let matched = EntryFilter::default()
        .date_range(day(2024, 1, 2), day(2024, 1, 3))
        .apply(&entries)
        .unwrap();
    assert_eq!(
        timestamps(&matched),
        vec!["2024-01-03T12:00:00", "2024-01-02T18:00:00"]
    );
}

#[test]
fn single_date_journal_ignores_the_range() {
    let entries = vec![
        entry("2024-06-01T08:00:00", "early", "joy"),
        entry("2024-06-01T23:00:00", "late", "fear"),
    ];
    let matched = EntryFilter::default()
        .date_range(day(2020, 1, 1), day(2020, 1, 2))
        .apply(&entries)
        .unwrap();
    assert_eq!(matched, entries);
    assert_eq!(
        date_span(&entries).unwrap(),
        Some((day(2024, 6, 1), day(2024, 6, 1)))
    );
}

#[test]
fn empty_journal_filters_to_nothing() {
    let filter = EntryFilter::default()
        .keyword("x")
        .emotion("joy")
        .date_range(day(2024, 1, 1), day(2024, 1, 2));
    assert!(filter.apply(&[]).unwrap().is_empty());
    assert_eq!(date_span(&[]).unwrap(), None);
    assert_eq!(emotion_options(&[]), vec![ALL_EMOTIONS]);
}

#[test]
fn emotion_options_list_present_labels() {
    assert_eq!(
        emotion_options(&journal()),
        vec!["All", "anger", "joy", "neutral", "sadness"]
    );
}

#[test]
fn filtering_never_mutates_the_collection() {
    let entries = journal();
    let snapshot = entries.clone();
    let _ = EntryFilter::default().emotion("anger").apply(&entries).unwrap();
    assert_eq!(entries, snapshot);
}
