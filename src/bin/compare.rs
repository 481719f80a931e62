//! Comparison CLI: score two retrieval runs against the same judgments and
//! test their MAP difference for statistical significance.

use clap::Parser;
use ireval::eval::{
    compare_runs, mean_average_precision, Qrels, ResultCollection, ResultColumns,
};
use std::path::PathBuf;

/// Compare two retrieval runs with a paired t-test over per-query AP.
#[derive(Parser, Debug)]
#[command(name = "compare")]
struct Args {
    /// Path to the qrels file (default: qrels.txt).
    #[arg(long, default_value = "qrels.txt")]
    qrels: PathBuf,

    /// Path to the baseline run CSV (side A).
    #[arg(long)]
    results_a: PathBuf,

    /// Path to the contrast run CSV (side B).
    #[arg(long)]
    results_b: PathBuf,

    /// Label for side A in the report.
    #[arg(long, default_value = "A")]
    label_a: String,

    /// Label for side B in the report.
    #[arg(long, default_value = "B")]
    label_b: String,

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

    let run_a = ResultCollection::from_path(&args.results_a, &columns)?;
    let run_b = ResultCollection::from_path(&args.results_b, &columns)?;
    log::info!(
        "Loaded {} queries ({}) and {} queries ({})",
        run_a.query_count(),
        args.results_a.display(),
        run_b.query_count(),
        args.results_b.display()
    );

    let report_a = mean_average_precision(&run_a, &qrels);
    let report_b = mean_average_precision(&run_b, &qrels);

    let comparison = compare_runs(&report_a.per_query, &report_b.per_query)?;

    println!("\n=== Paired Comparison (AP per query) ===");
    println!("MAP {:<11}: {:.6}", args.label_a, comparison.map_a);
    println!("MAP {:<11}: {:.6}", args.label_b, comparison.map_b);
    println!(
        "MAP difference : {:+.6} ({} - {})",
        comparison.map_delta, args.label_b, args.label_a
    );
    println!("Paired queries : {}", comparison.pairs);
    println!(
        "Paired t-test  : t({}) = {:.6}, p = {:.6}",
        comparison.df, comparison.statistic, comparison.p_value
    );
    println!("Verdict        : {}", comparison.verdict());

    Ok(())
}
