//! Flattened one-row-per-product summary used for spreadsheet exports.
//!
//! The column set and order in [`FLAT_ROW_HEADER`] is a compatibility
//! contract with downstream consumers; do not reorder fields on
//! [`FlatProductRow`].

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::Product;

/// Column names, in output order.
pub const FLAT_ROW_HEADER: [&str; 11] = [
    "_id",
    "name",
    "description",
    "price",
    "status",
    "is_active",
    "rating",
    "rate_count",
    "sold_count",
    "variant_count",
    "image_count",
];

#[derive(Debug, Error)]
pub enum FlatRowError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatProductRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub status: String,
    pub is_active: bool,
    pub rating: f64,
    pub rate_count: i64,
    pub sold_count: i64,
    pub variant_count: usize,
    pub image_count: usize,
}

impl FlatProductRow {
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            status: product.status.clone(),
            is_active: product.is_active,
            rating: product.rating,
            rate_count: product.rate_count,
            sold_count: product.sold_count,
            variant_count: product.variant_count(),
            image_count: product.image_count(),
        }
    }
}

/// Writes one flattened row per product, preceded by the header row.
///
/// Nothing is written for an empty slice. Returns the number of rows written.
///
/// # Errors
///
/// Returns [`FlatRowError`] if a row cannot be encoded or the writer fails.
pub fn write_flat_rows<W: io::Write>(writer: W, products: &[Product]) -> Result<usize, FlatRowError> {
    if products.is_empty() {
        return Ok(0);
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for product in products {
        wtr.serialize(FlatProductRow::from_product(product))?;
    }
    wtr.flush()?;
    Ok(products.len())
}

/// Reads flattened rows previously produced by [`write_flat_rows`].
///
/// # Errors
///
/// Returns [`FlatRowError::Csv`] on the first row that does not match the
/// flattened schema.
pub fn read_flat_rows<R: io::Read>(reader: R) -> Result<Vec<FlatProductRow>, FlatRowError> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize()
        .map(|row| row.map_err(FlatRowError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;

    use super::*;
    use crate::products::{Image, Variant, DEFAULT_STOCK};

    fn make_product(id: &str, name: &str, variants: usize, images: usize) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: "Soft, \"washed\" cotton,\nrelaxed fit".to_string(),
            price: 19.99,
            images: (1..=images)
                .map(|n| Image {
                    id: format!("img-{n}"),
                    url: format!("https://cdn.example.com/{n}.jpg"),
                    order: u32::try_from(n).unwrap(),
                })
                .collect(),
            option_groups: vec![],
            variants: (0..variants)
                .map(|n| Variant {
                    id: format!("var-{n}"),
                    sku: format!("S1-{n}"),
                    options: IndexMap::new(),
                    price: 19.99,
                    stock: DEFAULT_STOCK,
                    image: None,
                })
                .collect(),
            category_ids: vec![],
            seller_category_ids: vec![],
            seller_id: "seller-9".to_string(),
            status: "inactive".to_string(),
            is_active: true,
            rating: 4.7,
            rate_count: 0,
            sold_count: 310,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn header_matches_contract() {
        let mut buf = Vec::new();
        write_flat_rows(&mut buf, &[make_product("p1", "Tee", 1, 1)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, FLAT_ROW_HEADER.join(","));
    }

    #[test]
    fn from_product_counts_variants_and_images() {
        let row = FlatProductRow::from_product(&make_product("p1", "Tee", 4, 3));
        assert_eq!(row.variant_count, 4);
        assert_eq!(row.image_count, 3);
        assert_eq!(row.sold_count, 310);
    }

    #[test]
    fn empty_product_list_writes_nothing() {
        let mut buf = Vec::new();
        let written = write_flat_rows(&mut buf, &[]).unwrap();
        assert_eq!(written, 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn written_rows_read_back_with_identity_fields_intact() {
        let products = vec![
            make_product("p1", "Tee, crew neck", 6, 2),
            make_product("p2", "Hoodie", 1, 0),
        ];
        let mut buf = Vec::new();
        assert_eq!(write_flat_rows(&mut buf, &products).unwrap(), 2);

        let rows = read_flat_rows(buf.as_slice()).unwrap();
        assert_eq!(rows.len(), 2);
        for (row, product) in rows.iter().zip(&products) {
            assert_eq!(row.id, product.id);
            assert_eq!(row.name, product.name);
            assert!((row.price - product.price).abs() < f64::EPSILON);
            assert_eq!(row.status, product.status);
            assert_eq!(row.variant_count, product.variant_count());
            assert_eq!(row.image_count, product.image_count());
        }
        assert_eq!(rows[0].description, products[0].description);
    }

    #[test]
    fn read_flat_rows_rejects_non_numeric_counts() {
        let text = format!(
            "{}\np1,Tee,,1.0,active,true,0.0,0,0,many,0\n",
            FLAT_ROW_HEADER.join(",")
        );
        let result = read_flat_rows(text.as_bytes());
        assert!(matches!(result, Err(FlatRowError::Csv(_))));
    }
}
