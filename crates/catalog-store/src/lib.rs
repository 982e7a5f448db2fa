//! Persistence for canonical products.
//!
//! The store is modeled on a document database collection: documents are
//! keyed by `_id`, inserts are unordered, and a batch can land partially.

pub mod import;
pub mod memory;
pub mod ndjson;

use std::path::PathBuf;

use catalog_core::Product;
use thiserror::Error;

pub use import::{import_products, ImportSummary};
pub use memory::MemoryStore;
pub use ndjson::NdjsonStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode document {id}: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt document at {}:{line}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("batch partially written: {inserted} inserted, {failed} rejected ({reason})")]
    PartialBatch {
        inserted: usize,
        failed: usize,
        reason: String,
    },
}

/// A collection that accepts batches of canonical products.
pub trait DocumentWriter {
    /// Inserts every document it can from `batch`, in order, skipping those
    /// it must reject.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartialBatch`] when some documents were rejected
    /// (the others are still written), or another variant when the batch
    /// could not be applied at all.
    fn insert_batch(&mut self, batch: &[Product]) -> Result<usize, StoreError>;

    /// Number of documents currently in the collection.
    fn count_documents(&self) -> usize;
}

/// Message for rejected documents, listing at most a few ids.
pub(crate) fn duplicate_reason(ids: &[String]) -> String {
    const SHOWN: usize = 3;
    let shown = ids.iter().take(SHOWN).map(String::as_str).collect::<Vec<_>>();
    let mut reason = format!("duplicate _id: {}", shown.join(", "));
    if ids.len() > SHOWN {
        reason.push_str(&format!(" and {} more", ids.len() - SHOWN));
    }
    reason
}
