//! CLI `write` command: annotate and save one journal entry.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::Local;

use memlens::config::MemlensConfig;
use memlens::journal::annotate::{write_entry, Annotator};
use memlens::journal::store::EntryStore;
use memlens::journal::{daily_prompt, reflection_prompt};
use memlens::nlp::Models;

/// Save `text`, or the whole of stdin when no text is given.
pub fn write(config: &MemlensConfig, text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            println!("{}", daily_prompt(Local::now().date_naive()));
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read entry from stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        println!("Nothing to save.");
        return Ok(());
    }

    let store = EntryStore::open(config.resolved_entries_path())?;
    let models = Models::new(config);
    let annotator = Annotator::new(models.emotion()?, models.summarizer()?);

    if let Some(entry) = write_entry(&store, &annotator, &text, Local::now().naive_local())? {
        println!("Entry saved! Detected emotion: {}", entry.emotion);
        println!("Summary: {}", entry.summary);
        println!("{}", reflection_prompt(&entry.emotion));
    }
    Ok(())
}
