//! `import` command: canonical JSON -> file document store.

use std::path::Path;

use anyhow::Context;
use catalog_core::{AppConfig, Product};
use catalog_store::{import_products, DocumentWriter, ImportSummary, NdjsonStore};

/// Loads canonical products from `input` and imports them into the configured
/// collection.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded, or the
/// collection cannot be opened. Failed batches are logged, not returned.
pub(crate) fn run_import(config: &AppConfig, input: &Path) -> anyhow::Result<ImportSummary> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let products: Vec<Product> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of products", input.display()))?;
    tracing::info!(count = products.len(), path = %input.display(), "loaded products");

    if products.is_empty() {
        tracing::warn!("no products to import");
        return Ok(ImportSummary::default());
    }

    let path = config.collection_path();
    let mut store = NdjsonStore::open(&path)
        .with_context(|| format!("failed to open collection {}", path.display()))?;
    tracing::info!(
        database = %config.database,
        collection = %config.collection,
        batch_size = config.import_batch_size,
        "importing products"
    );

    let summary = import_products(&mut store, &products, config.import_batch_size);

    println!(
        "Total documents inserted: {} out of {}",
        summary.inserted, summary.attempted
    );
    println!(
        "Collection '{}' now contains {} documents",
        config.collection,
        store.count_documents()
    );
    if summary.failed_batches > 0 {
        tracing::warn!(failed_batches = summary.failed_batches, "import finished with errors");
    }

    Ok(summary)
}
