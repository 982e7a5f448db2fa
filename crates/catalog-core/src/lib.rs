pub mod app_config;
pub mod config;
pub mod flat_row;
pub mod products;
pub mod timestamp;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use flat_row::{read_flat_rows, write_flat_rows, FlatProductRow, FlatRowError, FLAT_ROW_HEADER};
pub use products::{Image, OptionGroup, Product, Variant, DEFAULT_STOCK};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
