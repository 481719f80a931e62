//! Batch document feeding.
//!
//! Reads a JSON array of documents from disk and sends it to the search
//! service in fixed-size batches. Documents are posted verbatim; any text
//! analysis happens inside the service.

use crate::error::{IrevalError, Result};
use crate::solr::client::SolrClient;
use serde_json::Value;
use std::path::Path;

/// Totals from one feeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    pub documents: usize,
    pub batches: usize,
}

/// Read a document file: a top-level JSON array of arbitrary JSON documents.
pub fn load_documents(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|e| {
        IrevalError::Format(format!("document file {}: {}", path.display(), e))
    })?;
    match value {
        Value::Array(docs) => Ok(docs),
        _ => Err(IrevalError::Format(format!(
            "document file {}: expected a top-level JSON array",
            path.display()
        ))),
    }
}

/// Partition documents into update batches. The final batch carries the
/// remainder; a zero batch size is treated as 1.
pub fn split_batches(documents: &[Value], batch_size: usize) -> Vec<&[Value]> {
    documents.chunks(batch_size.max(1)).collect()
}

/// Feed documents to the service batch by batch, committing once at the end
/// when requested. Progress is logged per batch.
pub async fn feed_documents(
    client: &SolrClient,
    documents: &[Value],
    batch_size: usize,
    commit: bool,
) -> Result<FeedStats> {
    let batches = split_batches(documents, batch_size);
    let mut sent = 0usize;

    for batch in &batches {
        client.add_documents(batch).await?;
        sent += batch.len();
        log::info!("{} / {} documents sent", sent, documents.len());
    }

    if commit && !documents.is_empty() {
        client.commit().await?;
        log::info!("Commit issued");
    }

    Ok(FeedStats {
        documents: sent,
        batches: batches.len(),
    })
}
