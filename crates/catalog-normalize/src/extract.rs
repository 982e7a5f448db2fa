//! Field extraction from raw records.
//!
//! Both entry points are total: malformed cells degrade to empty or zero
//! defaults and are logged at `debug`, never returned as errors.

use crate::error::NormalizeError;
use crate::types::{ExtractedFields, FlatRow, ListingStats, SourceShape, StructuredRecord, VariationSpec};

/// CSV column names.
mod columns {
    pub(super) const TITLE: &str = "title";
    pub(super) const FINAL_PRICE: &str = "final_price";
    pub(super) const DESCRIPTION: &str = "Product Description";
    pub(super) const IMAGE: &str = "image";
    pub(super) const VARIATIONS: &str = "variations";
    pub(super) const SELLER_ID: &str = "seller_id";
    pub(super) const IS_AVAILABLE: &str = "is_available";
    pub(super) const RATING: &str = "rating";
    pub(super) const SOLD: &str = "sold";
}

const EMPTY_JSON_ARRAY: &str = "[]";

/// Decodes one JSON-encoded raw record.
///
/// # Errors
///
/// Returns [`NormalizeError::Deserialize`] if `raw` is not a JSON object or a
/// known key holds a value of the wrong type.
pub fn parse_structured_record(raw: &str) -> Result<StructuredRecord, NormalizeError> {
    serde_json::from_str(raw).map_err(|source| NormalizeError::Deserialize {
        context: "structured product record".to_string(),
        source,
    })
}

/// Extracts the field tuple from a structured record. Values are used as-is.
#[must_use]
pub fn extract_structured(mut record: StructuredRecord) -> ExtractedFields {
    let description = record.take_description();
    ExtractedFields {
        title: record.title,
        price: record.final_price,
        description,
        image_urls: record.image,
        variations: record.variations,
        shape: SourceShape::Structured,
    }
}

/// Extracts the field tuple from a CSV row, coercing string cells.
#[must_use]
pub fn extract_flat_row(row: &FlatRow) -> ExtractedFields {
    let cell = |key: &str| row.get(key).map(String::as_str);

    let stats = ListingStats {
        seller_id: cell(columns::SELLER_ID).unwrap_or_default().to_string(),
        status: availability_status(cell(columns::IS_AVAILABLE).unwrap_or_default()).to_string(),
        rating: parse_f64_or_zero(cell(columns::RATING)),
        sold_count: parse_i64_or_zero(cell(columns::SOLD)),
    };

    ExtractedFields {
        title: trimmed(cell(columns::TITLE)),
        price: parse_f64_or_zero(cell(columns::FINAL_PRICE)),
        description: trimmed(cell(columns::DESCRIPTION)),
        image_urls: parse_image_cell(cell(columns::IMAGE).unwrap_or(EMPTY_JSON_ARRAY)),
        variations: parse_variations_cell(cell(columns::VARIATIONS).unwrap_or(EMPTY_JSON_ARRAY)),
        shape: SourceShape::FlatRow(stats),
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Parses a float cell. Empty, missing, unparseable, and non-finite values
/// all become `0.0`.
pub(crate) fn parse_f64_or_zero(value: Option<&str>) -> f64 {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parses an integer cell. Empty, missing, and unparseable values become `0`.
pub(crate) fn parse_i64_or_zero(value: Option<&str>) -> i64 {
    value
        .map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
}

fn availability_status(value: &str) -> &'static str {
    if value.trim().eq_ignore_ascii_case("true") {
        "active"
    } else {
        "inactive"
    }
}

/// Parses the `image` cell: a JSON array when it starts with `[`, otherwise
/// a comma-separated list with blank entries dropped.
pub(crate) fn parse_image_cell(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(value) {
            Ok(urls) => urls,
            Err(e) => {
                tracing::debug!(error = %e, "malformed image cell; using no images");
                Vec::new()
            }
        }
    } else {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Parses the `variations` cell as a JSON array of variation specs.
pub(crate) fn parse_variations_cell(value: &str) -> Vec<VariationSpec> {
    let value = value.trim();
    if value.is_empty() || value == EMPTY_JSON_ARRAY {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<VariationSpec>>(value) {
        Ok(specs) => specs,
        Err(e) => {
            tracing::debug!(error = %e, "malformed variations cell; using no variations");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
