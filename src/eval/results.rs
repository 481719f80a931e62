//! Ranked result set loading.
//!
//! A run is a CSV export with a header row; each data row is one retrieved
//! document for one query. File order per query is the rank order and is
//! preserved exactly as read.

use crate::error::{IrevalError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// One retrieved document with its retrieval score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: String,
    pub score: f64,
}

/// Header names identifying the query id, document id, and score columns.
///
/// Defaults match what the `search` run harness writes. Exports from other
/// tooling (different header language, extra columns) load by overriding the
/// names; columns not named here are ignored.
#[derive(Debug, Clone)]
pub struct ResultColumns {
    pub query_id: String,
    pub doc_id: String,
    pub score: String,
}

impl Default for ResultColumns {
    fn default() -> Self {
        Self {
            query_id: "query_id".to_string(),
            doc_id: "doc_id".to_string(),
            score: "score".to_string(),
        }
    }
}

/// Ranked result lists for a set of queries, keyed by query identifier.
///
/// Also remembers the order in which queries were first encountered, so
/// per-query reporting follows the run file rather than hash order.
#[derive(Debug, Clone, Default)]
pub struct ResultCollection {
    lists: HashMap<String, Vec<ScoredDoc>>,
    encounter_order: Vec<String>,
}

impl ResultCollection {
    /// Load a result table from a file.
    pub fn from_path(path: &Path, columns: &ResultColumns) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, columns)
    }

    /// Load a result table from any reader.
    ///
    /// A missing named column or an unparseable score is a format error: a
    /// corrupt run must not silently under-report. Document ids are unwrapped
    /// from singleton-list serializations (see [`normalize_doc_id`]).
    pub fn from_reader<R: Read>(reader: R, columns: &ResultColumns) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let query_idx = column_index(&headers, &columns.query_id)?;
        let doc_idx = column_index(&headers, &columns.doc_id)?;
        let score_idx = column_index(&headers, &columns.score)?;

        let mut collection = Self::default();

        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = idx + 1;

            let query_id = field(&record, query_idx, row)?.trim().to_string();
            let doc_id = normalize_doc_id(field(&record, doc_idx, row)?);
            let raw_score = field(&record, score_idx, row)?;
            let score: f64 = raw_score.trim().parse().map_err(|_| {
                IrevalError::Format(format!(
                    "result row {}: invalid score '{}' for query '{}'",
                    row, raw_score, query_id
                ))
            })?;

            collection.push(query_id, ScoredDoc { doc_id, score });
        }

        Ok(collection)
    }

    fn push(&mut self, query_id: String, doc: ScoredDoc) {
        match self.lists.get_mut(&query_id) {
            Some(list) => list.push(doc),
            None => {
                self.encounter_order.push(query_id.clone());
                self.lists.insert(query_id, vec![doc]);
            }
        }
    }

    /// Ranked list for one query, rank 1 first.
    pub fn get(&self, query_id: &str) -> Option<&[ScoredDoc]> {
        self.lists.get(query_id).map(|v| v.as_slice())
    }

    /// Iterate queries in the order they first appeared in the source.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ScoredDoc])> {
        self.encounter_order
            .iter()
            .map(|id| (id.as_str(), self.lists[id].as_slice()))
    }

    pub fn query_count(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Strip list/quote wrapping from a document identifier.
///
/// Result producers sometimes emit id fields as a serialized singleton list,
/// e.g. `['42']` or `["doc-7"]`. Removes `[`, `]`, `'`, `"` and surrounding
/// whitespace; a bare identifier passes through unchanged.
pub fn normalize_doc_id(raw: &str) -> String {
    let unbracketed: String = raw
        .trim()
        .trim_matches(|c| c == '[' || c == ']')
        .chars()
        .filter(|c| *c != '\'' && *c != '"')
        .collect();
    unbracketed.trim().to_string()
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| IrevalError::Format(format!("result table missing column '{}'", name)))
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize, row: usize) -> Result<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| IrevalError::Format(format!("result row {}: too few fields", row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> ResultCollection {
        ResultCollection::from_reader(text.as_bytes(), &ResultColumns::default()).unwrap()
    }

    #[test]
    fn loads_rows_in_file_order() {
        let run = load(
            "query_id,doc_id,rank,score\n\
             1,doc-b,1,9.5\n\
             1,doc-a,2,8.0\n\
             2,doc-c,1,7.25\n",
        );
        assert_eq!(run.query_count(), 2);
        let first = run.get("1").unwrap();
        assert_eq!(first[0].doc_id, "doc-b");
        assert_eq!(first[1].doc_id, "doc-a");
        assert!((first[0].score - 9.5).abs() < 1e-9);
    }

    #[test]
    fn preserves_query_encounter_order() {
        let run = load(
            "query_id,doc_id,score\n\
             7,doc-a,1.0\n\
             3,doc-b,1.0\n\
             7,doc-c,0.5\n\
             5,doc-d,1.0\n",
        );
        let order: Vec<&str> = run.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["7", "3", "5"]);
    }

    #[test]
    fn unwraps_listlike_doc_ids() {
        let run = load("query_id,doc_id,score\n1,\"['42']\",1.0\n");
        assert_eq!(run.get("1").unwrap()[0].doc_id, "42");
    }

    #[test]
    fn normalize_doc_id_variants() {
        assert_eq!(normalize_doc_id("['42']"), "42");
        assert_eq!(normalize_doc_id("[\"doc-7\"]"), "doc-7");
        assert_eq!(normalize_doc_id(" 42 "), "42");
        assert_eq!(normalize_doc_id("42"), "42");
        assert_eq!(normalize_doc_id("[ 'a b' ]"), "a b");
    }

    #[test]
    fn bad_score_is_a_format_error() {
        let err = ResultCollection::from_reader(
            "query_id,doc_id,score\n1,doc-a,fast\n".as_bytes(),
            &ResultColumns::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IrevalError::Format(_)));
        assert!(err.to_string().contains("row 1"));
        assert!(err.to_string().contains("fast"));
    }

    #[test]
    fn missing_column_is_a_format_error() {
        let err = ResultCollection::from_reader(
            "query_id,document,score\n1,doc-a,1.0\n".as_bytes(),
            &ResultColumns::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IrevalError::Format(_)));
        assert!(err.to_string().contains("doc_id"));
    }

    #[test]
    fn custom_column_names() {
        let columns = ResultColumns {
            query_id: "consulta".to_string(),
            doc_id: "documento".to_string(),
            score: "pontuacao".to_string(),
        };
        let run = ResultCollection::from_reader(
            "consulta,documento,pontuacao\n1,doc-a,2.5\n".as_bytes(),
            &columns,
        )
        .unwrap();
        assert_eq!(run.get("1").unwrap()[0].doc_id, "doc-a");
    }
}
