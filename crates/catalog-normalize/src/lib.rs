pub mod error;
pub mod extract;
pub mod ids;
pub mod normalize;
pub mod source;
pub mod types;

pub use error::NormalizeError;
pub use extract::{extract_flat_row, extract_structured, parse_structured_record};
pub use ids::{Clock, FixedClock, IdentifierGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use normalize::{
    normalize_from_flat_row, normalize_from_structured, variant_sku, Normalizer, DEFAULT_SKU,
};
pub use source::{read_raw_rows, read_structured_records};
pub use types::{ExtractedFields, FlatRow, ListingStats, SourceShape, StructuredRecord, VariationSpec};
