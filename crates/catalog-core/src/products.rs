use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stock assigned to every generated variant.
pub const DEFAULT_STOCK: u32 = 100;

/// A canonical, store-ready product document built from one raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Gallery in source order; `order` is the 1-based position.
    pub images: Vec<Image>,
    pub option_groups: Vec<OptionGroup>,
    pub variants: Vec<Variant>,
    /// Always empty at normalization time; assigned by catalog tooling later.
    pub category_ids: Vec<String>,
    pub seller_category_ids: Vec<String>,
    pub seller_id: String,
    /// `"active"`, `"inactive"`, or empty when the source has no availability flag.
    pub status: String,
    pub is_active: bool,
    pub rating: f64,
    pub rate_count: i64,
    pub sold_count: i64,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the total number of variants for this product.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Looks up a variant by its generated SKU.
    #[must_use]
    pub fn variant_by_sku(&self, sku: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.sku == sku)
    }

    /// Looks up an option group by its lowercase key.
    #[must_use]
    pub fn option_group(&self, key: &str) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.key == key)
    }
}

/// A product image. Owned by exactly one product; never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
    /// 1-based position in the source URL list.
    pub order: u32,
}

/// A named variation dimension (e.g. `"color"`) with its values in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    /// Lowercased variation name.
    pub key: String,
    pub values: Vec<String>,
}

/// One concrete combination of option values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(rename = "_id")]
    pub id: String,
    /// `"S1-"` followed by the selected values joined with `-`, or `"S1-DEFAULT"`.
    pub sku: String,
    /// Option key to selected value, in group declaration order.
    pub options: IndexMap<String, String>,
    pub price: f64,
    pub stock: u32,
    /// Image URL shown for this variant; serialized as `null` when absent.
    pub image: Option<String>,
}
