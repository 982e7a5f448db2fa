use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Environment {
    /// Whether log output uses ANSI colors. Off in production.
    #[must_use]
    pub fn ansi_logs(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Root directory of the file-backed document store.
    pub store_dir: PathBuf,
    pub database: String,
    pub collection: String,
    /// Documents per write batch. Always at least 1.
    pub import_batch_size: usize,
    /// When set, variant image selection is seeded so repeated runs pick the
    /// same image for the same record position.
    pub variant_image_seed: Option<u64>,
}

impl AppConfig {
    /// Path of the collection file inside the store, e.g.
    /// `./store/products_db/products.ndjson`.
    #[must_use]
    pub fn collection_path(&self) -> PathBuf {
        self.store_dir
            .join(&self.database)
            .join(format!("{}.ndjson", self.collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_logs_disabled_only_in_production() {
        assert!(Environment::Development.ansi_logs());
        assert!(Environment::Test.ansi_logs());
        assert!(!Environment::Production.ansi_logs());
    }

    #[test]
    fn environment_display_matches_env_value() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
    }
}
