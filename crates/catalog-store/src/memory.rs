use std::collections::HashMap;

use catalog_core::Product;

use crate::{duplicate_reason, DocumentWriter, StoreError};

/// In-memory collection with the same `_id` uniqueness rules as
/// [`crate::NdjsonStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Vec<Product>,
    index: HashMap<String, usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.documents[pos])
    }

    /// Documents in insertion order.
    #[must_use]
    pub fn documents(&self) -> &[Product] {
        &self.documents
    }
}

impl DocumentWriter for MemoryStore {
    fn insert_batch(&mut self, batch: &[Product]) -> Result<usize, StoreError> {
        let mut inserted = 0;
        let mut rejected = Vec::new();

        for product in batch {
            if self.index.contains_key(&product.id) {
                rejected.push(product.id.clone());
                continue;
            }
            self.index.insert(product.id.clone(), self.documents.len());
            self.documents.push(product.clone());
            inserted += 1;
        }

        if rejected.is_empty() {
            Ok(inserted)
        } else {
            Err(StoreError::PartialBatch {
                inserted,
                failed: rejected.len(),
                reason: duplicate_reason(&rejected),
            })
        }
    }

    fn count_documents(&self) -> usize {
        self.documents.len()
    }
}
