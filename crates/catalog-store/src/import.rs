//! Batched import with partial-failure tolerance.

use catalog_core::Product;

use crate::{DocumentWriter, StoreError};

/// Totals for one [`import_products`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub attempted: usize,
    pub inserted: usize,
    /// Batches that returned an error, whether partially applied or not.
    pub failed_batches: usize,
}

impl ImportSummary {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_batches == 0 && self.inserted == self.attempted
    }
}

/// Writes `products` in batches of `batch_size`, continuing past failed
/// batches. Documents from a partially applied batch are still counted.
///
/// A `batch_size` of zero is treated as one.
pub fn import_products<W>(writer: &mut W, products: &[Product], batch_size: usize) -> ImportSummary
where
    W: DocumentWriter + ?Sized,
{
    let batch_size = batch_size.max(1);
    let mut summary = ImportSummary {
        attempted: products.len(),
        ..ImportSummary::default()
    };

    for (index, batch) in products.chunks(batch_size).enumerate() {
        let batch_number = index + 1;
        match writer.insert_batch(batch) {
            Ok(inserted) => {
                summary.inserted = summary.inserted.saturating_add(inserted);
                tracing::info!(batch = batch_number, inserted, "inserted batch");
            }
            Err(StoreError::PartialBatch {
                inserted,
                failed,
                reason,
            }) => {
                summary.inserted = summary.inserted.saturating_add(inserted);
                summary.failed_batches += 1;
                tracing::warn!(
                    batch = batch_number,
                    inserted,
                    failed,
                    reason = %reason,
                    "batch had errors"
                );
            }
            Err(e) => {
                summary.failed_batches += 1;
                tracing::error!(batch = batch_number, error = %e, "batch failed");
            }
        }
    }

    tracing::info!(
        inserted = summary.inserted,
        attempted = summary.attempted,
        failed_batches = summary.failed_batches,
        "import finished"
    );
    summary
}
