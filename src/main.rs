mod document;
mod ingest;
mod normalize;
mod pipeline;
mod record;
mod settings;
mod source;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::ingest::RunSummary;
use crate::settings::Settings;
use crate::source::Source;
use crate::store::TypesenseClient;

#[derive(Parser)]
#[command(name = "people_etl", about = "Candidate-profile JSONL importer for the people search index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop and recreate the people collection
    Init,
    /// Import a local newline-delimited JSON export
    Import {
        /// Path to the JSONL file
        path: PathBuf,
        /// Max lines to process (default: whole file)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Import a JSONL export fetched over HTTP (e.g. a pre-signed object URL)
    ImportUrl {
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let store = TypesenseClient::new(&settings)?;

    match cli.command {
        Commands::Init => {
            store.recreate_collection().await?;
            println!("Created collection '{}'", settings.collection);
        }
        Commands::Import { path, limit } => {
            let reader = Source::File(path).open().await?;
            let summary = pipeline::run(reader, &store, limit).await?;
            print_summary(&summary);
        }
        Commands::ImportUrl { url } => {
            let reader = Source::Url(url).open().await?;
            let summary = pipeline::run(reader, &store, None).await?;
            print_summary(&summary);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Import complete:");
    println!("  Lines:    {}", summary.line_count);
    println!("  Imported: {}", summary.success_count);
    println!("  Errors:   {}", summary.error_count);
}
