//! Evaluation CLI: score one retrieval run against relevance judgments and
//! report per-query AP and MAP.

use clap::Parser;
use ireval::eval::{
    mean_average_precision_observed, LogObserver, Qrels, ResultCollection, ResultColumns,
};
use ireval::IrevalError;
use std::path::PathBuf;

/// Score a retrieval run against relevance judgments.
#[derive(Parser, Debug)]
#[command(name = "evaluate")]
struct Args {
    /// Path to the qrels file (default: qrels.txt).
    #[arg(long, default_value = "qrels.txt")]
    qrels: PathBuf,

    /// Path to the run CSV to score.
    #[arg(long)]
    results: PathBuf,

    /// Header name of the query id column.
    #[arg(long, default_value = "query_id")]
    query_column: String,

    /// Header name of the document id column.
    #[arg(long, default_value = "doc_id")]
    doc_column: String,

    /// Header name of the score column.
    #[arg(long, default_value = "score")]
    score_column: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();

    let qrels = Qrels::from_path(&args.qrels)?;
    log::info!(
        "Loaded judgments for {} queries from {}",
        qrels.query_count(),
        args.qrels.display()
    );

    let columns = ResultColumns {
        query_id: args.query_column,
        doc_id: args.doc_column,
        score: args.score_column,
    };
    let run = ResultCollection::from_path(&args.results, &columns)?;
    log::info!(
        "Loaded {} queries from {}",
        run.query_count(),
        args.results.display()
    );

    let report = mean_average_precision_observed(&run, &qrels, &mut LogObserver);

    if report.is_empty() {
        return Err(IrevalError::InsufficientData(format!(
            "no query in {} has relevance judgments; nothing to evaluate",
            args.results.display()
        ))
        .into());
    }

    println!("\n=== Evaluation Results ===");
    for query in &report.per_query {
        println!("  {:<12} AP = {:.4}", query.query_id, query.ap);
    }
    println!("\nQueries scored: {}", report.per_query.len());
    println!("MAP:            {:.4}", report.map);

    Ok(())
}
