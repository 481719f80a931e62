//! Run CLI: dispatch every judged topic against the search service and write
//! the ranked hits as a results CSV ready for `evaluate` / `compare`.

use clap::Parser;
use ireval::eval::Qrels;
use ireval::solr::SolrClient;
use ireval::topics::{filter_judged, load_topics};
use ireval::Config;
use std::path::PathBuf;
use std::time::Instant;

/// Run judged topics against the search service and export a results CSV.
#[derive(Parser, Debug)]
#[command(name = "search")]
struct Args {
    /// Path to the qrels file (default: qrels.txt).
    #[arg(long, default_value = "qrels.txt")]
    qrels: PathBuf,

    /// Path to the topics file (queryId<TAB>queryText).
    #[arg(long)]
    topics: PathBuf,

    /// Output CSV path.
    #[arg(long, default_value = "results.csv")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load()?;

    let qrels = Qrels::from_path(&args.qrels)?;
    let topics = load_topics(&args.topics)?;
    let total_topics = topics.len();
    let judged = filter_judged(topics, &qrels);

    if judged.is_empty() {
        anyhow::bail!(
            "none of the {} topics in {} has relevance judgments in {}",
            total_topics,
            args.topics.display(),
            args.qrels.display()
        );
    }

    log::info!(
        "Running {} judged topics (of {} loaded) against {}",
        judged.len(),
        total_topics,
        config.solr.base_url
    );

    let client = SolrClient::new(&config.solr)?;

    let mut writer = csv::Writer::from_path(&args.output)?;
    writer.write_record(["query_id", "doc_id", "rank", "score"])?;

    let total_start = Instant::now();
    let mut total_rows = 0usize;

    for topic in &judged {
        let start = Instant::now();
        let hits = client.query(&topic.text).await?;

        for (i, hit) in hits.iter().enumerate() {
            let rank = (i + 1).to_string();
            let score = hit.score.to_string();
            writer.write_record([
                topic.query_id.as_str(),
                hit.doc_id.as_str(),
                rank.as_str(),
                score.as_str(),
            ])?;
        }
        writer.flush()?;
        total_rows += hits.len();

        log::info!(
            "query {}: {} hits in {:?}",
            topic.query_id,
            hits.len(),
            start.elapsed()
        );
    }

    log::info!("=== Run Complete ===");
    log::info!("Queries dispatched: {}", judged.len());
    log::info!("Rows written: {} ({})", total_rows, args.output.display());
    log::info!("Total time: {:?}", total_start.elapsed());

    Ok(())
}
