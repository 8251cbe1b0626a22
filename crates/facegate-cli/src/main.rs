use anyhow::Result;
use clap::{Parser, Subcommand};

use facegate_service::Config;
use facegate_store::{CryptoBox, GalleryKey, GalleryStore, LoadReport};

#[derive(Parser)]
#[command(name = "facegate", about = "Facegate gallery administration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gallery status (record count, names, unreadable files)
    Status,
    /// List enrolled records with ids and enrollment times
    List,
    /// Generate a fresh ENCRYPTION_KEY value to persist in configuration
    Genkey,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let (store, report) = open_store().await?;
            let names = store.names().await;
            println!(
                "{}",
                serde_json::json!({
                    "count": names.len(),
                    "names": names,
                    "skipped": report.skipped,
                })
            );
            if report.nothing_readable() {
                eprintln!(
                    "warning: {} record file(s) present but none decrypted — check ENCRYPTION_KEY",
                    report.skipped
                );
            }
        }
        Commands::List => {
            let (store, _) = open_store().await?;
            for record in store.snapshot().await {
                println!("{}  {}  {}", record.id, record.created_at, record.name);
            }
        }
        Commands::Genkey => {
            let (_, hex) = GalleryKey::generate();
            println!("{hex}");
            eprintln!("set ENCRYPTION_KEY to this value before enrolling any faces");
        }
    }

    Ok(())
}

/// Open the gallery store from environment configuration, the same way the
/// service does at startup.
async fn open_store() -> Result<(GalleryStore, LoadReport)> {
    let config = Config::from_env();
    let key = config.resolve_key()?;
    let (store, report) =
        GalleryStore::open(&config.known_faces_dir, CryptoBox::new(&key)).await?;
    Ok((store, report))
}
