//! Metronome CLI - expectations for metrics, tracked in Git history.

mod config;
mod pipeline;
mod report;

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use metronome_scanner::scan_history;
use metronome_storage::{stringify_readings, ReadingsFile};
use config::{author_from, parse_assignment, RecordConfig, ScanConfig, DEFAULT_READINGS_PATH};

#[derive(Parser)]
#[command(name = "metronome")]
#[command(about = "Track metric expectations declared in Git history", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every expectation against the recorded readings
    Scan {
        /// Repository path
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Only track readings recorded for this branch
        #[arg(long)]
        branch: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Write readings to the readings file and commit them if changed
    Record {
        /// Repository path
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Branch the readings were taken on
        #[arg(long)]
        branch: String,
        /// Readings file path template
        #[arg(long, default_value = DEFAULT_READINGS_PATH)]
        readings_path: String,
        /// Commit author name
        #[arg(long)]
        author_name: Option<String>,
        /// Commit author email
        #[arg(long)]
        author_email: Option<String>,
        /// Readings as meter=value
        #[arg(required = true)]
        readings: Vec<String>,
    },
    /// List marker commits found in history
    Show {
        /// Repository path
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan { repo, branch, format } => {
            let config = ScanConfig { repo, branch };
            let board = tokio::task::spawn_blocking(move || pipeline::build_board(&config))
                .await
                .context("scan task failed")??;
            let snapshot = board.snapshot();

            match format {
                Format::Text => print!("{}", report::render_snapshot(&snapshot)),
                Format::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            }
        }
        Commands::Record {
            repo,
            branch,
            readings_path,
            author_name,
            author_email,
            readings,
        } => {
            let config = RecordConfig {
                repo,
                branch,
                readings_path,
                author: author_from(author_name, author_email)?,
            };
            let values = readings
                .iter()
                .map(|arg| parse_assignment(arg).map(|(name, value)| (name, Some(value))))
                .collect::<Result<Vec<_>>>()?;

            let file = ReadingsFile::from_template(&config.repo, &config.readings_path, &config.branch);
            let content = stringify_readings(values);
            let committed = file
                .update(&content, &config.commit_message(), config.author.as_ref())
                .await
                .with_context(|| format!("failed to record readings to {}", file.path().display()))?;

            match committed {
                Some(sha) => println!("Committed {} via {}", file.relative_path().display(), sha),
                None => println!("No change in readings"),
            }
        }
        Commands::Show { repo } => {
            let commits = tokio::task::spawn_blocking(move || scan_history(&repo))
                .await
                .context("scan task failed")??;

            info!("Found {} marker entries", commits.len());
            for commit in &commits {
                println!("{}", report::render_commit(commit));
            }
        }
    }

    Ok(())
}
