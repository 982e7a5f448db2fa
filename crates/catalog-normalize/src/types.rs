//! Raw record shapes accepted by the extractor, and the field set it produces.
//!
//! ## Structured (JSON) records
//!
//! Keys observed in scraped product dumps:
//! - `title`, `final_price` (JSON number), `image` (array of URL strings),
//!   `variations` (array of `{name, variations: [..]}`).
//! - The description lives under `"Product Desciption"` in older dumps and
//!   `"Product Description"` in newer ones; some carry a plain `"description"`
//!   as well. Each key is kept separately and the first present one wins, in
//!   that order (see [`StructuredRecord::description`]).
//!
//! Values are taken as already typed. A key holding the wrong JSON type makes
//! the record undecodable, which is a per-record failure. Explicit `null`
//! is treated like an absent key.
//!
//! ## Flat (CSV) rows
//!
//! Every cell is a string. `image` and `variations` carry JSON-encoded text
//! (or, for `image`, a comma-separated list). Numeric and boolean columns need
//! coercion; see [`crate::extract`].

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// A CSV row: column name to raw cell text.
pub type FlatRow = HashMap<String, String>;

/// One named variation dimension as it appears in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VariationSpec {
    /// Display name, e.g. `"Color"`. Lowercased to form the option key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Values in listing order, e.g. `["Red", "Blue"]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variations: Vec<String>,
}

/// A JSON-shaped raw product record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StructuredRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub final_price: f64,

    /// Description under the misspelled key older dumps use.
    #[serde(default, rename = "Product Desciption")]
    pub legacy_description: Option<String>,

    #[serde(default, rename = "Product Description")]
    pub labelled_description: Option<String>,

    #[serde(default, rename = "description")]
    pub plain_description: Option<String>,

    /// Image URLs in gallery order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub variations: Vec<VariationSpec>,
}

impl StructuredRecord {
    /// The description, taken from the first key present in the order
    /// `"Product Desciption"`, `"Product Description"`, `"description"`.
    /// A `null` value counts as absent.
    #[must_use]
    pub fn description(&self) -> &str {
        self.legacy_description
            .as_deref()
            .or(self.labelled_description.as_deref())
            .or(self.plain_description.as_deref())
            .unwrap_or_default()
    }

    /// Consumes the description keys, with the same precedence as
    /// [`StructuredRecord::description`].
    pub(crate) fn take_description(&mut self) -> String {
        self.legacy_description
            .take()
            .or_else(|| self.labelled_description.take())
            .or_else(|| self.plain_description.take())
            .unwrap_or_default()
    }
}

/// Which source shape a field set was extracted from.
///
/// The two shapes diverge when no usable variation exists:
/// flat rows get a single default variant, structured records get none.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceShape {
    Structured,
    FlatRow(ListingStats),
}

/// Marketplace listing data only flat rows carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingStats {
    pub seller_id: String,
    /// `"active"` when `is_available` is `true` (any case), else `"inactive"`.
    pub status: String,
    pub rating: f64,
    pub sold_count: i64,
}

/// The normalized field tuple handed from the extractor to the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub image_urls: Vec<String>,
    pub variations: Vec<VariationSpec>,
    pub shape: SourceShape,
}

/// Deserializes `null` as `T::default()`. Pair with `#[serde(default)]` so
/// absent keys are covered too.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_record_defaults_when_keys_absent() {
        let record: StructuredRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, StructuredRecord::default());
    }

    #[test]
    fn structured_record_null_values_become_defaults() {
        let record: StructuredRecord = serde_json::from_str(
            r#"{"title": null, "final_price": null, "image": null, "variations": null}"#,
        )
        .unwrap();
        assert_eq!(record.title, "");
        assert!(record.final_price.abs() < f64::EPSILON);
        assert!(record.image.is_empty());
        assert!(record.variations.is_empty());
    }

    #[test]
    fn structured_record_accepts_misspelled_description_key() {
        let record: StructuredRecord =
            serde_json::from_str(r#"{"Product Desciption": "Old key"}"#).unwrap();
        assert_eq!(record.description(), "Old key");

        let record: StructuredRecord =
            serde_json::from_str(r#"{"Product Description": "New key"}"#).unwrap();
        assert_eq!(record.description(), "New key");

        let record: StructuredRecord =
            serde_json::from_str(r#"{"description": "Plain key"}"#).unwrap();
        assert_eq!(record.description(), "Plain key");
    }

    #[test]
    fn structured_record_with_every_description_key_decodes() {
        let record: StructuredRecord = serde_json::from_str(
            r#"{"title":"Mug","description":"short","Product Description":"labelled","Product Desciption":"long"}"#,
        )
        .expect("record with all description keys should decode");
        assert_eq!(record.title, "Mug");
        assert_eq!(record.description(), "long");

        let record: StructuredRecord =
            serde_json::from_str(r#"{"description":"short","Product Description":"labelled"}"#)
                .unwrap();
        assert_eq!(record.description(), "labelled");
    }

    #[test]
    fn null_description_key_falls_through() {
        let record: StructuredRecord =
            serde_json::from_str(r#"{"Product Desciption":null,"description":"short"}"#).unwrap();
        assert_eq!(record.description(), "short");

        let record: StructuredRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.description(), "");
    }

    #[test]
    fn structured_record_integer_price_decodes_as_float() {
        let record: StructuredRecord = serde_json::from_str(r#"{"final_price": 20}"#).unwrap();
        assert!((record.final_price - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn structured_record_ignores_unknown_keys() {
        let record: StructuredRecord =
            serde_json::from_str(r#"{"title": "Mug", "asin": "B000", "reviews": []}"#).unwrap();
        assert_eq!(record.title, "Mug");
    }

    #[test]
    fn structured_record_wrong_type_is_an_error() {
        let result = serde_json::from_str::<StructuredRecord>(r#"{"image": "a.jpg"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn variation_spec_missing_fields_default() {
        let spec: VariationSpec = serde_json::from_str(r#"{"name": "Size"}"#).unwrap();
        assert_eq!(spec.name, "Size");
        assert!(spec.variations.is_empty());
    }
}
