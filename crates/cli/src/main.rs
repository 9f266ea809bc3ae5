//! Command-line interface for ZIP extraction.
//!
//! This CLI tool provides a simple interface for extracting ZIP archives
//! and listing their entries from the command line.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;
use unzipper::{ExtractOptions, ExtractStats};

#[derive(Parser)]
#[command(name = "unzipper")]
#[command(version, about = "Extract ZIP archives from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one or more archives
    Extract {
        /// Archive files to extract
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Log every created directory and extracted file
        #[arg(short, long)]
        verbose: bool,

        /// Print extraction statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List archive entries
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            archives,
            out,
            verbose,
            json,
        } => handle_extract(archives, out, verbose, json).await,
        Commands::List { archive, json } => handle_list(archive, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn handle_extract(
    archives: Vec<PathBuf>,
    out: PathBuf,
    verbose: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions { verbose };

    for archive in archives {
        // Per-entry lines already cover progress in verbose mode
        let spinner = (!verbose).then(|| spinner_for(&archive));

        let archive_for_blocking = archive.clone();
        let out_for_blocking = out.clone();
        let options_for_blocking = options.clone();

        let result = tokio::task::spawn_blocking(move || {
            unzipper::unzip_file(
                &archive_for_blocking,
                &out_for_blocking,
                &options_for_blocking,
            )
        })
        .await?;

        if let Some(spinner) = &spinner {
            spinner.finish_and_clear();
        }
        let stats = result?;

        if json {
            println!("{}", serde_json::to_string(&stats)?);
        } else {
            report(&archive, &stats);
        }
    }

    Ok(())
}

fn handle_list(archive: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let entries = unzipper::list_file(&archive)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.path);
    }
    Ok(())
}

fn spinner_for(archive: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Extracting {}", archive.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn report(archive: &Path, stats: &ExtractStats) {
    info!(
        archive = %archive.display(),
        files = stats.files_extracted,
        directories = stats.directories_created,
        bytes = stats.bytes_written,
        "extraction complete"
    );
}
