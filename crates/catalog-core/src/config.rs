use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested against a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_optional_u64 = |var: &str| -> Result<Option<u64>, ConfigError> {
        match lookup(var) {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|e| ConfigError::InvalidEnvVar {
                        var: var.to_string(),
                        reason: e.to_string(),
                    })
            }
            _ => Ok(None),
        }
    };

    let env = parse_environment(&or_default("CATALOG_ENV", "development"));
    let log_level = or_default("CATALOG_LOG_LEVEL", "info");
    let store_dir = PathBuf::from(or_default("CATALOG_STORE_DIR", "./store"));
    let database = or_default("CATALOG_DATABASE", "products_db");
    let collection = or_default("CATALOG_COLLECTION", "products");

    let import_batch_size = parse_usize("CATALOG_IMPORT_BATCH_SIZE", "1000")?;
    if import_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CATALOG_IMPORT_BATCH_SIZE".to_string(),
            reason: "batch size must be at least 1".to_string(),
        });
    }

    let variant_image_seed = parse_optional_u64("CATALOG_VARIANT_IMAGE_SEED")?;

    Ok(AppConfig {
        env,
        log_level,
        store_dir,
        database,
        collection,
        import_batch_size,
        variant_image_seed,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
