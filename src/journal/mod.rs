pub mod annotate;
pub mod filter;
pub mod insights;
pub mod store;
pub mod types;

/// Message shown instead of insights when the journal has no entries.
pub const EMPTY_JOURNAL_MESSAGE: &str = "No entries yet. Start by writing one!";

/// Shown when a date range is requested over a journal that covers a single day.
pub fn single_date_notice(date: chrono::NaiveDate) -> String {
    format!("Only one entry on {date}. Showing all data.")
}

/// Reflection prompt shown under each listed entry.
pub fn reflection_prompt(emotion: &str) -> String {
    format!("Would you like to explore this feeling of {emotion} more?")
}

/// Daily check-in line shown before writing, e.g. "Monday, Jan 01".
pub fn daily_prompt(today: chrono::NaiveDate) -> String {
    format!(
        "Daily Mood Check-in: how are you feeling today ({})?",
        today.format("%A, %b %d")
    )
}
