//! Search service glue: query dispatch and batch document feeding.

pub mod client;
pub mod feed;

pub use client::{SearchHit, SolrClient};
pub use feed::{feed_documents, load_documents, FeedStats};
