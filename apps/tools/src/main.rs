use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use board_core::{
    board::{load_cycle, BoardSnapshot, RenderTarget},
    ingest::{group_rows_by_day, split_tsv},
    layout::record_label,
    source_from_location,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::{Parser, Subcommand};
use shared::error::ErrorNotice;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Converts a tab-separated sheet export into the weekday-keyed board document.
    Ingest {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Prints the nine buckets for a document.
    Buckets {
        #[arg(long)]
        source: String,
        /// Classify as if it were this day (`YYYY-MM-DD`).
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

/// Writes the board to stdout.
struct TextTarget;

impl RenderTarget for TextTarget {
    fn show_board(&mut self, snapshot: &BoardSnapshot) {
        for bucket in &snapshot.classification.buckets {
            println!("{} ({})", bucket.title, bucket.members.len());
            for record in &bucket.members {
                println!("  {}", record_label(record));
            }
        }
        if snapshot.classification.excluded > 0 {
            println!(
                "{} record(s) without a usable date",
                snapshot.classification.excluded
            );
        }
    }

    fn show_error(&mut self, notice: &ErrorNotice) {
        eprintln!("{}", notice.message);
    }
}

fn reference_instant(today: Option<NaiveDate>) -> Result<DateTime<Local>> {
    let Some(day) = today else {
        return Ok(Local::now());
    };
    let noon = day
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow!("invalid reference day {day}"))?;
    Local
        .from_local_datetime(&noon)
        .earliest()
        .ok_or_else(|| anyhow!("{day} 12:00 does not exist in the local timezone"))
}

fn ingest(input: &Path, output: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let document = group_rows_by_day(&split_tsv(&raw));

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&document)?)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "wrote {} records to {}",
        document.record_count(),
        output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Ingest { input, output } => ingest(&input, &output)?,
        Command::Buckets { source, today } => {
            let now = reference_instant(today)?;
            let source = source_from_location(&source);
            let mut target = TextTarget;
            load_cycle(source.as_ref(), Some(&mut target), &now).await?;
        }
    }

    Ok(())
}
