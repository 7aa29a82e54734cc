//! vaultload: compute the expected state of migrated datasets from the vault.
//!
//! Reads DATABASE_URL, BAG_STORE_URL and BAG_INDEX_URL (and the optional
//! settings of `LoaderConfig`) from the environment or a `.env` file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use vaultload_bagstore::HttpBagStore;
use vaultload_cli::{collect_identifiers, init_tracing, run_batch};
use vaultload_core::{AccountSubstitutions, LoaderConfig};
use vaultload_db::{setup_database, ExpectedRepository};
use vaultload_services::{RetryPolicy, RetryingStore, VaultLoader};

#[derive(Parser)]
#[command(name = "vaultload", about = "Load expected datasets and files from the vault")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the lineages of the given base bags
    Load {
        /// Bag identifiers
        ids: Vec<String>,
        /// File with one bag identifier per line
        #[arg(long)]
        file: Option<PathBuf>,
        /// Identifiers processed at the same time (default: LOAD_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = LoaderConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Load {
            ids,
            file,
            concurrency,
        } => {
            let (ids, invalid) = collect_identifiers(&ids, file.as_deref())?;

            let pool = setup_database(&config).await?;
            let client = HttpBagStore::new(
                &config.bag_store_url,
                &config.bag_index_url,
                config.http_timeout(),
            )?;
            let accounts = AccountSubstitutions::load(&config.config_dir)?;
            let store = RetryingStore::new(
                Arc::new(ExpectedRepository::new(pool)),
                RetryPolicy::from_config(&config),
            );
            let loader = VaultLoader::new(Arc::new(client), store, Arc::new(accounts));

            tracing::info!(count = ids.len(), "Loading bags from the vault");
            let mut summary = run_batch(
                Arc::new(loader),
                ids,
                concurrency.unwrap_or(config.load_concurrency),
            )
            .await?;
            summary.skipped_invalid = invalid.len();

            let out = serde_json::to_string_pretty(&summary).context("Serialize summary")?;
            println!("{}", out);

            if summary.has_failures() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
