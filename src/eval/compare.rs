//! Paired comparison of two evaluation runs.

use crate::error::{IrevalError, Result};
use crate::eval::metrics::QueryAp;
use crate::eval::stats::paired_ttest;
use std::collections::HashMap;
use std::fmt;

/// Fixed significance threshold for the paired test verdict.
pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Result of comparing two runs on their common queries.
///
/// `queries`, `ap_a`, and `ap_b` are aligned: position `k` in each refers to
/// the same query. `map_delta` is `map_b - map_a`, so a positive delta means
/// side B scored higher.
#[derive(Debug, Clone)]
pub struct PairedComparison {
    pub queries: Vec<String>,
    pub ap_a: Vec<f64>,
    pub ap_b: Vec<f64>,
    pub map_a: f64,
    pub map_b: f64,
    pub map_delta: f64,
    pub statistic: f64,
    pub p_value: f64,
    pub df: usize,
    pub pairs: usize,
    pub significant: bool,
}

impl PairedComparison {
    /// One-line verdict at the fixed α = 0.05 threshold.
    pub fn verdict(&self) -> &'static str {
        if self.significant {
            "statistically significant (p < 0.05)"
        } else {
            "not significant (p >= 0.05)"
        }
    }
}

impl fmt::Display for PairedComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MAP A          : {:.6}", self.map_a)?;
        writeln!(f, "MAP B          : {:.6}", self.map_b)?;
        writeln!(f, "MAP difference : {:+.6}", self.map_delta)?;
        writeln!(f, "Paired queries : {}", self.pairs)?;
        writeln!(f, "t statistic    : {:.6}", self.statistic)?;
        writeln!(f, "p-value        : {:.6}", self.p_value)?;
        write!(f, "Verdict        : {}", self.verdict())
    }
}

/// Align two per-query AP lists on their common query identifiers and run a
/// paired t-test on the aligned values.
///
/// Alignment traverses the identifier intersection in sorted order, so both
/// sequences index the same query at each position regardless of the order
/// either run was evaluated in. Queries present on only one side are dropped.
/// Fewer than 2 common queries is an `InsufficientData` failure.
pub fn compare_runs(side_a: &[QueryAp], side_b: &[QueryAp]) -> Result<PairedComparison> {
    let b_by_id: HashMap<&str, f64> = side_b
        .iter()
        .map(|q| (q.query_id.as_str(), q.ap))
        .collect();

    let mut aligned: Vec<(&str, f64, f64)> = side_a
        .iter()
        .filter_map(|q| {
            b_by_id
                .get(q.query_id.as_str())
                .map(|&ap_b| (q.query_id.as_str(), q.ap, ap_b))
        })
        .collect();
    aligned.sort_by(|x, y| x.0.cmp(y.0));

    if aligned.len() < 2 {
        return Err(IrevalError::InsufficientData(format!(
            "{} common quer{} between the two runs, need at least 2 for a paired test",
            aligned.len(),
            if aligned.len() == 1 { "y" } else { "ies" }
        )));
    }

    let queries: Vec<String> = aligned.iter().map(|(id, _, _)| id.to_string()).collect();
    let ap_a: Vec<f64> = aligned.iter().map(|(_, a, _)| *a).collect();
    let ap_b: Vec<f64> = aligned.iter().map(|(_, _, b)| *b).collect();

    let pairs = aligned.len();
    let map_a = ap_a.iter().sum::<f64>() / pairs as f64;
    let map_b = ap_b.iter().sum::<f64>() / pairs as f64;

    let test = paired_ttest(&ap_a, &ap_b)?;

    Ok(PairedComparison {
        queries,
        ap_a,
        ap_b,
        map_a,
        map_b,
        map_delta: map_b - map_a,
        statistic: test.statistic,
        p_value: test.p_value,
        df: test.df,
        pairs,
        significant: test.p_value < SIGNIFICANCE_ALPHA,
    })
}
