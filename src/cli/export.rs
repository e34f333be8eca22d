//! CLI `export` command: write filtered entries as Markdown or PDF, or a single
//! entry as a PNG card.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use memlens::config::MemlensConfig;
use memlens::export::{render_card, render_markdown, render_pdf, select_card_entry};
use memlens::journal::types::Entry;

use super::{load_entries, FilterArgs};

pub fn markdown(config: &MemlensConfig, args: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let entries = filtered(config, args)?;
    let doc = render_markdown(&config.export.title, &entries);
    emit(doc.as_bytes(), output)
}

pub fn pdf(config: &MemlensConfig, args: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let entries = filtered(config, args)?;
    let doc = render_pdf(&config.export.title, &entries)?;
    emit(&doc, output)
}

/// Render the first entry stamped `timestamp` as a PNG card.
pub fn card(config: &MemlensConfig, timestamp: &str, output: &Path) -> Result<()> {
    let entries = load_entries(config)?;
    let entry = select_card_entry(&entries, timestamp)
        .with_context(|| format!("no entry with timestamp {timestamp}"))?;
    let png = render_card(entry, config.export.card_width, config.export.card_height)?;
    emit(&png, Some(output))
}

fn filtered(config: &MemlensConfig, args: &FilterArgs) -> Result<Vec<Entry>> {
    let entries = load_entries(config)?;
    let matched = args.to_filter(&entries)?.apply(&entries)?;
    tracing::info!(entries = matched.len(), "exporting");
    Ok(matched)
}

/// Write to `output`, or to stdout when no path is given.
fn emit(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
