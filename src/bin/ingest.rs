//! Ingestion CLI: feed a JSON document file to the search service in batches.

use clap::Parser;
use ireval::solr::{feed_documents, load_documents, SolrClient};
use ireval::Config;
use std::path::PathBuf;
use std::time::Instant;

/// Feed a JSON document file to the search service.
#[derive(Parser, Debug)]
#[command(name = "ingest")]
struct Args {
    /// Path to the document file: a top-level JSON array.
    #[arg(long, default_value = "documents.json")]
    documents: PathBuf,

    /// Skip the final commit even if the configuration requests one.
    #[arg(long)]
    no_commit: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load()?;

    log::info!("Loading documents from {}", args.documents.display());
    let documents = load_documents(&args.documents)?;
    if documents.is_empty() {
        log::warn!("No documents in {}. Nothing to feed.", args.documents.display());
        return Ok(());
    }
    log::info!("Loaded {} documents", documents.len());

    let client = SolrClient::new(&config.solr)?;
    let commit = config.indexing.commit && !args.no_commit;

    let start = Instant::now();
    let stats = feed_documents(&client, &documents, config.indexing.batch_size, commit).await?;
    let elapsed = start.elapsed();

    log::info!("=== Feeding Complete ===");
    log::info!("Documents sent: {}", stats.documents);
    log::info!("Batches: {} (batch size {})", stats.batches, config.indexing.batch_size);
    log::info!("Committed: {}", commit);
    log::info!("Time: {:?}", elapsed);

    Ok(())
}
