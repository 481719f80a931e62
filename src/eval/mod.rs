//! Evaluation engine: relevance judgments, ranked runs, AP/MAP, and paired
//! significance comparison of two runs.

pub mod compare;
pub mod metrics;
pub mod qrels;
pub mod results;
pub mod stats;

pub use compare::{compare_runs, PairedComparison, SIGNIFICANCE_ALPHA};
pub use metrics::{
    average_precision, mean_average_precision, mean_average_precision_observed, EvalObserver,
    LogObserver, MapReport, QueryAp, SilentObserver,
};
pub use qrels::{JudgmentMap, Qrels};
pub use results::{normalize_doc_id, ResultCollection, ResultColumns, ScoredDoc};
pub use stats::{paired_ttest, PairedTTest};
