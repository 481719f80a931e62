//! Relevance judgment (qrels) store.
//!
//! Judgment files are plain text, one record per line, four whitespace-separated
//! fields: `queryId iteration documentId grade`. The iteration field is a
//! placeholder inherited from the TREC format and is ignored.

use crate::error::{IrevalError, Result};
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Judged documents for one query: document id → integer relevance grade.
/// A grade > 0 means relevant; 0 (or absent) means non-relevant.
pub type JudgmentMap = HashMap<String, i32>;

/// Ground-truth relevance judgments for a set of queries.
///
/// Built once from a judgment source and immutable afterwards; downstream
/// components share it read-only. Query identifiers are kept as trimmed
/// strings, matching the normalization used by the result and topics loaders.
#[derive(Debug, Clone, Default)]
pub struct Qrels {
    judgments: HashMap<String, JudgmentMap>,
}

impl Qrels {
    /// Load judgments from a file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load judgments from any buffered reader.
    ///
    /// Lines that do not have exactly four whitespace-separated fields are
    /// skipped: judgment files commonly carry stray headers or blank lines.
    /// A four-field line with a non-integer grade fails the whole load, since
    /// it means the file is not what we think it is.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut judgments: HashMap<String, JudgmentMap> = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 4 {
                if !fields.is_empty() {
                    log::debug!("qrels line {}: skipping malformed record: {}", idx + 1, line);
                }
                continue;
            }

            let grade: i32 = fields[3].parse().map_err(|_| {
                IrevalError::Format(format!(
                    "qrels line {}: invalid relevance grade '{}'",
                    idx + 1,
                    fields[3]
                ))
            })?;

            judgments
                .entry(fields[0].to_string())
                .or_default()
                .insert(fields[2].to_string(), grade);
        }

        Ok(Self { judgments })
    }

    /// Judgments for one query, if any were recorded.
    pub fn for_query(&self, query_id: &str) -> Option<&JudgmentMap> {
        self.judgments.get(query_id)
    }

    /// Number of documents judged relevant (grade > 0) for a query.
    pub fn relevant_count(&self, query_id: &str) -> usize {
        self.judgments
            .get(query_id)
            .map(|docs| docs.values().filter(|&&g| g > 0).count())
            .unwrap_or(0)
    }

    /// True if the query has at least one document judged relevant.
    pub fn has_relevant(&self, query_id: &str) -> bool {
        self.relevant_count(query_id) > 0
    }

    /// Identifiers of all queries with at least one relevant document.
    /// Used to restrict a topic run to queries that can actually be scored.
    pub fn judged_query_ids(&self) -> HashSet<&str> {
        self.judgments
            .iter()
            .filter(|(_, docs)| docs.values().any(|&g| g > 0))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Number of queries with any judgment record.
    pub fn query_count(&self) -> usize {
        self.judgments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(text: &str) -> Qrels {
        Qrels::from_reader(Cursor::new(text)).unwrap()
    }

    #[test]
    fn parses_four_field_records() {
        let qrels = load("1 0 doc-a 1\n1 0 doc-b 0\n2 0 doc-c 2\n");
        assert_eq!(qrels.query_count(), 2);
        assert_eq!(qrels.for_query("1").unwrap()["doc-a"], 1);
        assert_eq!(qrels.for_query("1").unwrap()["doc-b"], 0);
        assert_eq!(qrels.relevant_count("1"), 1);
        assert_eq!(qrels.relevant_count("2"), 1);
    }

    #[test]
    fn skips_malformed_lines() {
        let qrels = load("header line\n\n1 0 doc-a 1\n1 0 doc-b\n1 0 doc-c extra 1\n");
        assert_eq!(qrels.query_count(), 1);
        assert_eq!(qrels.for_query("1").unwrap().len(), 1);
    }

    #[test]
    fn bad_grade_is_a_format_error() {
        let err = Qrels::from_reader(Cursor::new("1 0 doc-a high\n")).unwrap_err();
        assert!(matches!(err, IrevalError::Format(_)));
        assert!(err.to_string().contains("line 1"));
        assert!(err.to_string().contains("high"));
    }

    #[test]
    fn query_ids_stay_strings() {
        // Numeric and non-numeric ids coexist; no coercion happens.
        let qrels = load("62 0 doc-a 1\nq7 0 doc-b 1\n");
        assert!(qrels.for_query("62").is_some());
        assert!(qrels.for_query("q7").is_some());
    }

    #[test]
    fn judged_query_ids_requires_positive_grade() {
        let qrels = load("1 0 doc-a 1\n2 0 doc-b 0\n3 0 doc-c 2\n");
        let ids = qrels.judged_query_ids();
        assert!(ids.contains("1"));
        assert!(ids.contains("3"));
        assert!(!ids.contains("2"));
        assert!(!qrels.has_relevant("2"));
    }

    #[test]
    fn duplicate_document_keeps_last_grade() {
        let qrels = load("1 0 doc-a 0\n1 0 doc-a 1\n");
        assert_eq!(qrels.for_query("1").unwrap()["doc-a"], 1);
    }
}
