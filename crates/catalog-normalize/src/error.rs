use thiserror::Error;

/// Failures that make a single raw record unusable.
///
/// Extraction and normalization themselves never fail; these errors come from
/// decoding a record out of its source before extraction begins.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
