//! HTTP client for a Solr-style search service.

use crate::config::SolrConfig;
use crate::error::{IrevalError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// One retrieved document as returned by the service, in service rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f64,
}

/// Thin client over one Solr collection.
///
/// Dispatches queries against the select handler and feeds documents through
/// the update handler. Requests run strictly sequentially; the client keeps
/// no state beyond the connection pool.
pub struct SolrClient {
    client: Client,
    select_url: Url,
    update_url: Url,
    rows: usize,
    id_field: String,
    search_field: String,
}

impl SolrClient {
    /// Build a client from the `[solr]` configuration section.
    pub fn new(config: &SolrConfig) -> Result<Self> {
        let base = config.base_url.trim_end_matches('/');
        let select_url = Url::parse(&format!("{}/select", base))
            .map_err(|e| IrevalError::Config(format!("invalid solr.base_url: {}", e)))?;
        let update_url = Url::parse(&format!("{}/update", base))
            .map_err(|e| IrevalError::Config(format!("invalid solr.base_url: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IrevalError::SearchService(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            select_url,
            update_url,
            rows: config.rows,
            id_field: config.id_field.clone(),
            search_field: config.search_field.clone(),
        })
    }

    /// Run one query and return the ranked hits.
    pub async fn query(&self, text: &str) -> Result<Vec<SearchHit>> {
        let rows = self.rows.to_string();
        let fl = format!("{},score", self.id_field);
        let response = self
            .client
            .get(self.select_url.clone())
            .query(&[
                ("q", text),
                ("rows", rows.as_str()),
                ("fl", fl.as_str()),
                ("df", self.search_field.as_str()),
                ("wt", "json"),
            ])
            .send()
            .await
            .map_err(|e| IrevalError::SearchService(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(IrevalError::SearchService(format!(
                "Query failed with status {}: {}",
                status, body
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| IrevalError::SearchService(format!("Failed to parse response: {}", e)))?;

        parse_hits(&payload, &self.id_field)
    }

    /// Send a batch of documents to the update handler without committing.
    pub async fn add_documents(&self, documents: &[Value]) -> Result<()> {
        self.update(documents, false).await
    }

    /// Issue a commit so previously added documents become searchable.
    pub async fn commit(&self) -> Result<()> {
        self.update(&[], true).await
    }

    async fn update(&self, documents: &[Value], commit: bool) -> Result<()> {
        let response = self
            .client
            .post(self.update_url.clone())
            .query(&[("commit", if commit { "true" } else { "false" })])
            .json(documents)
            .send()
            .await
            .map_err(|e| IrevalError::SearchService(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(IrevalError::SearchService(format!(
                "Update failed with status {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

/// Extract ranked hits from a select-handler payload.
///
/// The id field may arrive as a string, a number, or a singleton array of
/// either, depending on whether the schema marks it multi-valued. Score is
/// optional (0.0 when the service omits it).
fn parse_hits(payload: &Value, id_field: &str) -> Result<Vec<SearchHit>> {
    let docs = payload
        .get("response")
        .and_then(|r| r.get("docs"))
        .and_then(|d| d.as_array())
        .ok_or_else(|| {
            IrevalError::SearchService("response payload missing response.docs".to_string())
        })?;

    docs.iter()
        .map(|doc| {
            let id_value = doc.get(id_field).ok_or_else(|| {
                IrevalError::SearchService(format!("hit missing id field '{}'", id_field))
            })?;
            let doc_id = scalar_or_first(id_value).ok_or_else(|| {
                IrevalError::SearchService(format!(
                    "id field '{}' is not a string or number: {}",
                    id_field, id_value
                ))
            })?;
            let score = doc.get("score").and_then(Value::as_f64).unwrap_or(0.0);
            Ok(SearchHit { doc_id, score })
        })
        .collect()
}

fn scalar_or_first(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().and_then(scalar_to_string),
        other => scalar_to_string(other),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_scalar_id_hits() {
        let payload = json!({
            "response": {
                "docs": [
                    {"passage_id": "doc-1", "score": 9.5},
                    {"passage_id": "doc-2", "score": 8.25}
                ]
            }
        });
        let hits = parse_hits(&payload, "passage_id").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, "doc-1");
        assert!((hits[1].score - 8.25).abs() < 1e-9);
    }

    #[test]
    fn parses_singleton_array_ids() {
        // Multi-valued schema fields wrap the id in a one-element array.
        let payload = json!({
            "response": {"docs": [{"passage_id": ["42"], "score": 1.0}]}
        });
        let hits = parse_hits(&payload, "passage_id").unwrap();
        assert_eq!(hits[0].doc_id, "42");
    }

    #[test]
    fn parses_numeric_ids() {
        let payload = json!({
            "response": {"docs": [{"passage_id": 42, "score": 1.0}]}
        });
        let hits = parse_hits(&payload, "passage_id").unwrap();
        assert_eq!(hits[0].doc_id, "42");
    }

    #[test]
    fn missing_score_defaults_to_zero() {
        let payload = json!({
            "response": {"docs": [{"passage_id": "doc-1"}]}
        });
        let hits = parse_hits(&payload, "passage_id").unwrap();
        assert_eq!(hits[0].score, 0.0);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let err = parse_hits(&json!({"responseHeader": {}}), "passage_id").unwrap_err();
        assert!(matches!(err, IrevalError::SearchService(_)));
    }

    #[test]
    fn hit_without_id_field_is_an_error() {
        let payload = json!({
            "response": {"docs": [{"score": 1.0}]}
        });
        let err = parse_hits(&payload, "passage_id").unwrap_err();
        assert!(err.to_string().contains("passage_id"));
    }
}
