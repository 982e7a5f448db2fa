//! Construction of canonical [`catalog_core::Product`] documents from
//! extracted fields.
//!
//! Field coercion happens in [`crate::extract`]; this module assigns
//! identifiers, builds images and option groups, and expands variants.

use catalog_core::{Image, OptionGroup, Product, Variant, DEFAULT_STOCK};
use indexmap::IndexMap;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::extract::{extract_flat_row, extract_structured};
use crate::ids::{Clock, IdentifierGenerator, SystemClock, UuidGenerator};
use crate::types::{ExtractedFields, FlatRow, ListingStats, SourceShape, StructuredRecord, VariationSpec};

const SKU_PREFIX: &str = "S1";

/// SKU of the single variant emitted for a flat row without usable variations.
pub const DEFAULT_SKU: &str = "S1-DEFAULT";

/// Builds a variant SKU: `"S1-"` followed by the option values joined with `-`.
#[must_use]
pub fn variant_sku<S: AsRef<str>>(values: &[S]) -> String {
    format!("{SKU_PREFIX}-{}", values.iter().map(<S as AsRef<str>>::as_ref).join("-"))
}

/// Normalizes a structured record with fresh random identifiers, the system
/// clock, and an entropy-seeded image choice.
#[must_use]
pub fn normalize_from_structured(record: StructuredRecord) -> Product {
    Normalizer::new().normalize_from_structured(record)
}

/// Normalizes a CSV row with fresh random identifiers, the system clock, and
/// an entropy-seeded image choice.
#[must_use]
pub fn normalize_from_flat_row(row: &FlatRow) -> Product {
    Normalizer::new().normalize_from_flat_row(row)
}

/// Turns extracted fields into products.
///
/// Holds the identifier source, clock, and the random source used to pick a
/// variant image. Records are independent; reusing one normalizer across a
/// batch only advances the id sequence and the random stream.
#[derive(Debug)]
pub struct Normalizer<G = UuidGenerator, C = SystemClock, R = StdRng> {
    ids: G,
    clock: C,
    rng: R,
}

impl Normalizer {
    /// UUID identifiers, system clock, OS-seeded image choice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(UuidGenerator, SystemClock, StdRng::from_os_rng())
    }

    /// Like [`Normalizer::new`] but with a reproducible image choice.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(UuidGenerator, SystemClock, StdRng::seed_from_u64(seed))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, C, R> Normalizer<G, C, R>
where
    G: IdentifierGenerator,
    C: Clock,
    R: Rng,
{
    #[must_use]
    pub fn with_parts(ids: G, clock: C, rng: R) -> Self {
        Self { ids, clock, rng }
    }

    #[must_use]
    pub fn normalize_from_structured(&mut self, record: StructuredRecord) -> Product {
        self.normalize(extract_structured(record))
    }

    #[must_use]
    pub fn normalize_from_flat_row(&mut self, row: &FlatRow) -> Product {
        self.normalize(extract_flat_row(row))
    }

    /// Builds the canonical product for one extracted record.
    ///
    /// When no usable option group exists, flat rows get exactly one
    /// [`DEFAULT_SKU`] variant and structured records get no variants.
    #[must_use]
    pub fn normalize(&mut self, fields: ExtractedFields) -> Product {
        let ExtractedFields {
            title,
            price,
            description,
            image_urls,
            variations,
            shape,
        } = fields;

        let id = self.ids.next_id();
        let now = self.clock.now();

        let images = self.build_images(image_urls);

        let skip_unusable = matches!(shape, SourceShape::FlatRow(_));
        let (option_groups, lookup) = build_option_groups(variations, skip_unusable);

        let variants = if lookup.is_empty() {
            if skip_unusable {
                vec![self.default_variant(price, &images)]
            } else {
                Vec::new()
            }
        } else {
            self.expand_variants(&lookup, price, &images)
        };

        let stats = match shape {
            SourceShape::FlatRow(stats) => stats,
            SourceShape::Structured => ListingStats::default(),
        };

        Product {
            id,
            name: title,
            description,
            price,
            images,
            option_groups,
            variants,
            category_ids: Vec::new(),
            seller_category_ids: Vec::new(),
            seller_id: stats.seller_id,
            status: stats.status,
            is_active: true,
            rating: stats.rating,
            rate_count: 0,
            sold_count: stats.sold_count,
            created_at: now,
            updated_at: now,
        }
    }

    fn build_images(&mut self, urls: Vec<String>) -> Vec<Image> {
        urls.into_iter()
            .zip(1u32..)
            .map(|(url, order)| Image {
                id: self.ids.next_id(),
                url,
                order,
            })
            .collect()
    }

    /// One variant per element of the cartesian product of the lookup's value
    /// lists, enumerated in key order with the last key varying fastest.
    fn expand_variants(
        &mut self,
        lookup: &IndexMap<String, Vec<String>>,
        price: f64,
        images: &[Image],
    ) -> Vec<Variant> {
        lookup
            .values()
            .map(|values| values.iter())
            .multi_cartesian_product()
            .map(|combo| {
                let options = lookup
                    .keys()
                    .cloned()
                    .zip(combo.iter().map(|value| (*value).clone()))
                    .collect();
                Variant {
                    id: self.ids.next_id(),
                    sku: variant_sku(combo.as_slice()),
                    options,
                    price,
                    stock: DEFAULT_STOCK,
                    image: images.choose(&mut self.rng).map(|img| img.url.clone()),
                }
            })
            .collect()
    }

    fn default_variant(&mut self, price: f64, images: &[Image]) -> Variant {
        Variant {
            id: self.ids.next_id(),
            sku: DEFAULT_SKU.to_string(),
            options: IndexMap::new(),
            price,
            stock: DEFAULT_STOCK,
            image: images.first().map(|img| img.url.clone()),
        }
    }
}

/// Builds the option groups and the key-to-values lookup used for expansion.
///
/// Every kept spec produces an option group. The lookup is keyed by the
/// lowercased name: a repeated key keeps its first position but takes the
/// last declared values. With `skip_unusable`, specs with an empty key or no
/// values are dropped from both.
fn build_option_groups(
    specs: Vec<VariationSpec>,
    skip_unusable: bool,
) -> (Vec<OptionGroup>, IndexMap<String, Vec<String>>) {
    let mut groups = Vec::with_capacity(specs.len());
    let mut lookup = IndexMap::with_capacity(specs.len());

    for spec in specs {
        let key = spec.name.to_lowercase();
        if skip_unusable && (key.is_empty() || spec.variations.is_empty()) {
            continue;
        }
        lookup.insert(key.clone(), spec.variations.clone());
        groups.push(OptionGroup {
            key,
            values: spec.variations,
        });
    }

    (groups, lookup)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
