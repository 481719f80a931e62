//! Average Precision and Mean Average Precision.

use crate::eval::qrels::{JudgmentMap, Qrels};
use crate::eval::results::{ResultCollection, ScoredDoc};

/// Receives per-query diagnostics from the evaluation walk.
///
/// The metric functions never print; anything a caller wants to surface while
/// a run is scored (relevant hits as they are found, skipped queries) arrives
/// through this trait, keeping the computation itself testable.
pub trait EvalObserver {
    /// A relevant document was found at `rank` (1-based), with the running
    /// precision at that rank.
    fn relevant_hit(&mut self, _query_id: &str, _doc_id: &str, _rank: usize, _precision: f64) {}

    /// A query finished scoring.
    fn query_scored(&mut self, _query_id: &str, _ap: f64) {}

    /// A query was excluded because it has no judged relevant documents.
    fn query_skipped(&mut self, _query_id: &str) {}
}

/// Observer that discards all notifications.
pub struct SilentObserver;

impl EvalObserver for SilentObserver {}

/// Observer that forwards notifications to the `log` facade: per-hit detail
/// at debug level, per-query outcomes at info.
pub struct LogObserver;

impl EvalObserver for LogObserver {
    fn relevant_hit(&mut self, query_id: &str, doc_id: &str, rank: usize, precision: f64) {
        log::debug!(
            "query {}: relevant document {} at rank {} (precision {:.4})",
            query_id,
            doc_id,
            rank,
            precision
        );
    }

    fn query_scored(&mut self, query_id: &str, ap: f64) {
        log::info!("query {}: AP = {:.4}", query_id, ap);
    }

    fn query_skipped(&mut self, query_id: &str) {
        log::info!("query {}: skipped (no judged relevant documents)", query_id);
    }
}

/// One query's Average Precision value.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAp {
    pub query_id: String,
    pub ap: f64,
}

/// MAP plus the per-query AP values it was averaged from, in the order the
/// queries appeared in the result collection.
#[derive(Debug, Clone, Default)]
pub struct MapReport {
    pub map: f64,
    pub per_query: Vec<QueryAp>,
}

impl MapReport {
    /// True when no query qualified for evaluation.
    pub fn is_empty(&self) -> bool {
        self.per_query.is_empty()
    }
}

/// Average Precision for one ranked list against one query's judgments.
///
/// Walks the list in rank order (rank 1 = first element, ties trusted as
/// emitted). Each relevant document contributes the precision at its rank;
/// the sum is divided by the number of documents judged relevant in the
/// ground truth, not the number retrieved, which is what makes the measure
/// recall-sensitive. Returns 0.0 when the judgments contain no relevant
/// document. The result is always in [0, 1].
pub fn average_precision(ranked: &[ScoredDoc], judgments: &JudgmentMap) -> f64 {
    average_precision_observed("", ranked, judgments, &mut SilentObserver)
}

/// [`average_precision`] with per-hit observer notifications.
pub fn average_precision_observed(
    query_id: &str,
    ranked: &[ScoredDoc],
    judgments: &JudgmentMap,
    observer: &mut dyn EvalObserver,
) -> f64 {
    let total_relevant = judgments.values().filter(|&&g| g > 0).count();

    let mut hits = 0usize;
    let mut sum_precision = 0.0;
    for (i, doc) in ranked.iter().enumerate() {
        let rank = i + 1;
        let grade = judgments.get(&doc.doc_id).copied().unwrap_or(0);
        if grade > 0 {
            hits += 1;
            let precision = hits as f64 / rank as f64;
            sum_precision += precision;
            observer.relevant_hit(query_id, &doc.doc_id, rank, precision);
        }
    }

    if total_relevant == 0 {
        return 0.0;
    }
    sum_precision / total_relevant as f64
}

/// Mean Average Precision over every scorable query in the result collection.
///
/// A query is scorable when the qrels hold at least one relevant document for
/// it; others are excluded entirely and contribute nothing to the mean's
/// denominator, since a query without ground truth cannot be evaluated. With
/// no scorable query the report carries MAP 0.0 and an empty per-query list.
pub fn mean_average_precision(results: &ResultCollection, qrels: &Qrels) -> MapReport {
    mean_average_precision_observed(results, qrels, &mut SilentObserver)
}

/// [`mean_average_precision`] with observer notifications.
pub fn mean_average_precision_observed(
    results: &ResultCollection,
    qrels: &Qrels,
    observer: &mut dyn EvalObserver,
) -> MapReport {
    let mut per_query = Vec::new();

    for (query_id, ranked) in results.iter() {
        let judgments = match qrels.for_query(query_id) {
            Some(j) if qrels.has_relevant(query_id) => j,
            _ => {
                observer.query_skipped(query_id);
                continue;
            }
        };
        let ap = average_precision_observed(query_id, ranked, judgments, observer);
        observer.query_scored(query_id, ap);
        per_query.push(QueryAp {
            query_id: query_id.to_string(),
            ap,
        });
    }

    let map = if per_query.is_empty() {
        0.0
    } else {
        per_query.iter().map(|q| q.ap).sum::<f64>() / per_query.len() as f64
    };

    MapReport { map, per_query }
}
