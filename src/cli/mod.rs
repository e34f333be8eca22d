pub mod export;
pub mod insights;
pub mod list;
pub mod write;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;

use memlens::config::{MemlensConfig, ModelsConfig};
use memlens::journal::filter::{date_span, EntryFilter};
use memlens::journal::single_date_notice;
use memlens::journal::store::EntryStore;
use memlens::journal::types::Entry;
use memlens::nlp::ModelKind;

/// Filters shared by `list` and the document exports.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only entries containing this text (case-insensitive)
    #[arg(long, short)]
    pub keyword: Option<String>,
    /// Only entries with this emotion ("All" disables the filter)
    #[arg(long, short)]
    pub emotion: Option<String>,
    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// First date to include (YYYY-MM-DD); defaults to the earliest entry
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last date to include (YYYY-MM-DD); defaults to the latest entry
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filter(&self, entries: &[Entry]) -> Result<EntryFilter> {
        let mut filter = self.range.to_filter(entries)?;
        if let Some(ref keyword) = self.keyword {
            filter = filter.keyword(keyword.clone());
        }
        if let Some(ref emotion) = self.emotion {
            filter = filter.emotion(emotion.clone());
        }
        Ok(filter)
    }
}

impl RangeArgs {
    pub fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Date-range-only filter. Open ends default to the journal's own span.
    pub fn to_filter(&self, entries: &[Entry]) -> Result<EntryFilter> {
        let filter = EntryFilter::default();
        if !self.is_set() {
            return Ok(filter);
        }
        let Some((first, last)) = date_span(entries)? else {
            return Ok(filter);
        };
        if first == last {
            eprintln!("{}", single_date_notice(first));
        }

        let from = self.from.unwrap_or(first);
        let to = self.to.unwrap_or(last);
        anyhow::ensure!(from <= to, "--from {from} is after --to {to}");
        Ok(filter.date_range(from, to))
    }
}

/// The only date of a journal whose entries all fall on one day.
pub fn single_date(entries: &[Entry]) -> Result<Option<NaiveDate>> {
    Ok(match date_span(entries)? {
        Some((first, last)) if first == last => Some(first),
        _ => None,
    })
}

/// Load the full journal from the configured store.
pub fn load_entries(config: &MemlensConfig) -> Result<Vec<Entry>> {
    let store = EntryStore::open(config.resolved_entries_path())?;
    let entries = store.load()?;
    Ok(entries)
}

/// Download every model's ONNX export, tokenizer, and config to the cache directory.
pub async fn model_download(config: &MemlensConfig) -> Result<()> {
    let cache_dir = config.resolved_models_dir();
    for kind in ModelKind::ALL {
        download_model(kind, &config.models, &cache_dir).await?;
    }
    println!("Model download complete. Ready for use.");
    Ok(())
}

async fn download_model(kind: ModelKind, models: &ModelsConfig, cache_dir: &Path) -> Result<()> {
    let dir = kind.local_dir(cache_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create model dir: {}", dir.display()))?;

    println!("{kind} model ({})", kind.repo(models));
    for (remote, local) in kind.files() {
        let dest = dir.join(local);
        if dest.exists() {
            println!("  {local} already exists at {}", dest.display());
            continue;
        }
        println!("  Downloading {local}...");
        download_file(&kind.url(models, remote), &dest).await?;
        println!("  Saved to {}", dest.display());
    }
    Ok(())
}

/// Download a file from a URL with progress bar. Uses atomic write (tmp + rename).
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let mut response = reqwest::get(url)
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download of {url} failed with HTTP {}",
        response.status()
    );

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                    .context("invalid progress template")?
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    while let Some(chunk) = response.chunk().await.context("error reading response")? {
        file.write_all(&chunk)
            .await
            .context("error writing to file")?;
        pb.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .context("failed to rename temp file")?;

    pb.finish_and_clear();
    tracing::info!(path = %dest.display(), "model file downloaded");
    Ok(())
}
