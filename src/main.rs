mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memlens::config::MemlensConfig;

#[derive(Parser)]
#[command(name = "memlens", version, about = "Local AI journal with emotion tagging and insights")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a journal entry (reads stdin when TEXT is omitted)
    Write {
        /// Entry text
        text: Option<String>,
    },
    /// List entries, newest first
    List {
        #[command(flatten)]
        filters: cli::FilterArgs,
        /// Skip keywords, entities, and reflection prompts
        #[arg(long)]
        plain: bool,
    },
    /// Show the emotion filter options
    Emotions,
    /// Show personal insights
    Insights,
    /// Show the date × emotion heatmap
    Heatmap,
    /// Show the emotional trajectory over time
    Timeline {
        #[command(flatten)]
        range: cli::RangeArgs,
    },
    /// Export entries to a file
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },
    /// Manage the local models
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum ExportFormat {
    /// Filtered entries as Markdown
    Markdown {
        #[command(flatten)]
        filters: cli::FilterArgs,
        /// Output file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Filtered entries as PDF
    Pdf {
        #[command(flatten)]
        filters: cli::FilterArgs,
        /// Output file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// One entry as a PNG image card
    Card {
        /// Timestamp of the entry to render
        timestamp: String,
        /// Output PNG file
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the ONNX models to ~/.memlens/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = MemlensConfig::load()?;

    // Log to stderr so stdout stays clean for exported documents.
    let filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Write { text } => cli::write::write(&config, text)?,
        Command::List { filters, plain } => cli::list::list(&config, &filters, plain)?,
        Command::Emotions => cli::list::emotions(&config)?,
        Command::Insights => cli::insights::insights(&config)?,
        Command::Heatmap => cli::insights::heatmap(&config)?,
        Command::Timeline { range } => cli::insights::timeline(&config, &range)?,
        Command::Export { format } => match format {
            ExportFormat::Markdown { filters, output } => {
                cli::export::markdown(&config, &filters, output.as_deref())?
            }
            ExportFormat::Pdf { filters, output } => {
                cli::export::pdf(&config, &filters, output.as_deref())?
            }
            ExportFormat::Card { timestamp, output } => {
                cli::export::card(&config, &timestamp, &output)?
            }
        },
        Command::Model { action } => match action {
            ModelAction::Download => cli::model_download(&config).await?,
        },
    }

    Ok(())
}
