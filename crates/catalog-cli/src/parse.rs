//! `parse` command: raw source file -> canonical JSON + flattened CSV.
//!
//! Records that cannot be decoded are logged and skipped so one bad row does
//! not abort the run.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use catalog_core::{write_flat_rows, AppConfig, Product};
use catalog_normalize::{read_raw_rows, read_structured_records, Normalizer};

use crate::InputFormat;

/// Records logged individually at the start of a run.
const VERBOSE_HEAD: usize = 5;
/// After the head, log every Nth record.
const PROGRESS_EVERY: usize = 100;
const LOG_NAME_CHARS: usize = 50;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParseTotals {
    pub normalized: usize,
    pub skipped: usize,
}

/// Normalizes every record in `input` and writes both export files.
///
/// # Errors
///
/// Returns an error if the format cannot be determined, the input cannot be
/// opened or is not a record array at all, or an output file cannot be written.
pub(crate) fn run_parse(
    config: &AppConfig,
    input: &Path,
    format: Option<InputFormat>,
    json_out: &Path,
    csv_out: &Path,
) -> anyhow::Result<ParseTotals> {
    let format = format
        .or_else(|| InputFormat::from_path(input))
        .with_context(|| {
            format!(
                "cannot infer input format from {}; pass --format",
                input.display()
            )
        })?;

    let mut normalizer = match config.variant_image_seed {
        Some(seed) => Normalizer::with_seed(seed),
        None => Normalizer::new(),
    };

    tracing::info!(input = %input.display(), ?format, "reading products");
    let (products, skipped) = match format {
        InputFormat::Csv => normalize_csv(&mut normalizer, input)?,
        InputFormat::Json => normalize_json(&mut normalizer, input)?,
    };
    tracing::info!(normalized = products.len(), skipped, "parsed products");

    let file = File::create(json_out)
        .with_context(|| format!("failed to create {}", json_out.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &products)
        .with_context(|| format!("failed to write {}", json_out.display()))?;
    writer.flush()?;
    tracing::info!(count = products.len(), path = %json_out.display(), "exported canonical JSON");

    if products.is_empty() {
        tracing::warn!("no products to export as CSV");
    } else {
        let file = File::create(csv_out)
            .with_context(|| format!("failed to create {}", csv_out.display()))?;
        let written = write_flat_rows(BufWriter::new(file), &products)
            .with_context(|| format!("failed to write {}", csv_out.display()))?;
        tracing::info!(count = written, path = %csv_out.display(), "exported flattened CSV");
    }

    Ok(ParseTotals {
        normalized: products.len(),
        skipped,
    })
}

fn normalize_csv(normalizer: &mut Normalizer, input: &Path) -> anyhow::Result<(Vec<Product>, usize)> {
    let file = File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let rows = read_raw_rows(BufReader::new(file))
        .with_context(|| format!("failed to read CSV header from {}", input.display()))?;

    let mut products = Vec::new();
    let mut skipped = 0;
    for (index, row) in rows.enumerate() {
        let row_number = index + 1;
        match row {
            Ok(row) => {
                let product = normalizer.normalize_from_flat_row(&row);
                log_progress(row_number, &product);
                products.push(product);
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(row = row_number, error = %e, "skipping unreadable row");
            }
        }
    }
    Ok((products, skipped))
}

fn normalize_json(normalizer: &mut Normalizer, input: &Path) -> anyhow::Result<(Vec<Product>, usize)> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let records = read_structured_records(&text)?;

    let mut products = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (index, record) in records.into_iter().enumerate() {
        let record_number = index + 1;
        match record {
            Ok(record) => {
                let product = normalizer.normalize_from_structured(record);
                log_progress(record_number, &product);
                products.push(product);
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(record = record_number, error = %e, "skipping undecodable record");
            }
        }
    }
    Ok((products, skipped))
}

fn log_progress(count: usize, product: &Product) {
    if count <= VERBOSE_HEAD || count % PROGRESS_EVERY == 0 {
        let name: String = product.name.chars().take(LOG_NAME_CHARS).collect();
        tracing::info!(processed = count, latest = %name, "processed products");
    }
}
