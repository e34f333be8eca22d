//! CLI `insights`, `heatmap`, and `timeline` commands.

use anyhow::Result;
use chrono::Local;

use memlens::config::MemlensConfig;
use memlens::journal::insights::{
    compute_insights, heatmap as build_heatmap, observations, trajectory, Heatmap, Insights,
    TrajectoryPoint, UNKNOWN_EMOTION_INDEX,
};
use memlens::journal::{single_date_notice, EMPTY_JOURNAL_MESSAGE};
use memlens::nlp::Models;

use super::{load_entries, single_date, RangeArgs};

/// Display the personal insights report for the whole journal.
pub fn insights(config: &MemlensConfig) -> Result<()> {
    let entries = load_entries(config)?;
    if entries.is_empty() {
        println!("{EMPTY_JOURNAL_MESSAGE}");
        return Ok(());
    }

    let models = Models::new(config);
    let report = compute_insights(
        &entries,
        Local::now().naive_local(),
        &config.insights,
        models.keywords()?,
    )?;
    match report {
        Some(report) => print_insights(&report),
        None => println!("{EMPTY_JOURNAL_MESSAGE}"),
    }
    Ok(())
}

fn print_insights(report: &Insights) {
    println!("Personal Insights");
    println!("{}", "=".repeat(40));
    println!("  Total entries:       {}", report.total_entries);
    println!("  Most common emotion: {}", report.most_common_emotion);
    match report.happiest_day {
        Some(day) => println!("  Happiest day:        {}", day.format("%A, %b %d, %Y")),
        None => println!("  Happiest day:        no joyful entries yet"),
    }
    if let Some(hour) = report.active_hour {
        println!("  Most active hour:    {hour:02}:00");
    }
    println!();

    let weekly = &report.weekly;
    println!("Since {} ({} entries):", weekly.since.format("%Y-%m-%d"), weekly.entries);
    if weekly.entries == 0 {
        println!("  No entries in this period.");
    } else {
        for (emotion, count) in &weekly.emotions {
            println!("  {emotion:<12} {count}");
        }
        if !weekly.keywords.is_empty() {
            println!("  Themes: {}", weekly.keywords.join(", "));
        }
    }
    println!();

    println!("Emotion Frequency:");
    for row in &report.emotion_counts {
        println!("  {:<12} {:>4}  {}", row.emotion, row.count, "#".repeat(row.count));
    }

    if !report.top_words.is_empty() {
        println!();
        println!("Top Words:");
        for w in &report.top_words {
            println!("  {:<16} {}", w.word, w.count);
        }
    }
}

/// Display the date × emotion count matrix.
pub fn heatmap(config: &MemlensConfig) -> Result<()> {
    let entries = load_entries(config)?;
    if entries.is_empty() {
        println!("{EMPTY_JOURNAL_MESSAGE}");
        return Ok(());
    }
    let obs = observations(&entries)?;
    print!("{}", render_heatmap(&build_heatmap(&obs)));
    Ok(())
}

fn render_heatmap(map: &Heatmap) -> String {
    let width = map.emotions.iter().map(String::len).max().unwrap_or(0).max(3);
    let mut out = format!("{:<10}", "date");
    for emotion in &map.emotions {
        out.push_str(&format!(" {emotion:>width$}"));
    }
    out.push('\n');
    for (date, row) in map.dates.iter().zip(&map.counts) {
        out.push_str(&date.format("%Y-%m-%d").to_string());
        for count in row {
            out.push_str(&format!(" {count:>width$}"));
        }
        out.push('\n');
    }
    out
}

/// Display the emotional trajectory over the requested date range.
pub fn timeline(config: &MemlensConfig, range: &RangeArgs) -> Result<()> {
    let entries = load_entries(config)?;
    if entries.is_empty() {
        println!("{EMPTY_JOURNAL_MESSAGE}");
        return Ok(());
    }
    // With range flags the filter reports a one-day journal itself.
    if !range.is_set() {
        if let Some(date) = single_date(&entries)? {
            eprintln!("{}", single_date_notice(date));
        }
    }
    let view = range.to_filter(&entries)?.apply(&entries)?;
    let points = trajectory(&observations(&view)?, &config.insights.emotion_order);
    for point in &points {
        println!("{}", render_point(point));
    }
    Ok(())
}

fn render_point(point: &TrajectoryPoint) -> String {
    let bar = if point.index == UNKNOWN_EMOTION_INDEX {
        "?".to_string()
    } else {
        "*".repeat(point.index as usize + 1)
    };
    format!(
        "{}  {:<10} {:>2}  {bar}",
        point.at.format("%Y-%m-%d %H:%M"),
        point.emotion,
        point.index
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn heatmap_renders_one_row_per_date() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let map = Heatmap {
            dates: vec![d1, d2],
            emotions: vec!["joy".into(), "sadness".into()],
            counts: vec![vec![2, 0], vec![0, 1]],
        };
        let out = render_heatmap(&map);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date           joy sadness");
        assert_eq!(lines[1], "2024-01-01       2       0");
        assert_eq!(lines[2], "2024-01-02       0       1");
    }

    #[test]
    fn unknown_emotion_is_marked() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let point = TrajectoryPoint {
            at,
            emotion: "bored".into(),
            index: UNKNOWN_EMOTION_INDEX,
        };
        assert!(render_point(&point).ends_with("-1  ?"));

        let joy = TrajectoryPoint {
            at,
            emotion: "joy".into(),
            index: 6,
        };
        assert!(render_point(&joy).ends_with(" 6  *******"));
    }
}
