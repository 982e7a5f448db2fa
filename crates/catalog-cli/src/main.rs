mod import;
mod parse;

use std::path::{Path, PathBuf};

use catalog_core::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Normalize raw product records and load them into the catalog store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Infers the format from the file extension (case-insensitive).
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize raw records into canonical products and export them
    Parse {
        /// Raw CSV rows or a JSON array of raw records
        #[arg(long)]
        input: PathBuf,
        /// Input format; inferred from the extension when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,
        #[arg(long, default_value = "output_products.json")]
        json_out: PathBuf,
        #[arg(long, default_value = "output_products.csv")]
        csv_out: PathBuf,
    },
    /// Import canonical products into the document store
    Import {
        /// JSON array of canonical products, as written by `parse`
        #[arg(long, default_value = "output_products.json")]
        input: PathBuf,
        #[arg(long)]
        store_dir: Option<PathBuf>,
        #[arg(long)]
        database: Option<String>,
        #[arg(long)]
        collection: Option<String>,
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = catalog_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.env.ansi_logs())
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Some(Commands::Parse {
            input,
            format,
            json_out,
            csv_out,
        }) => {
            let totals = parse::run_parse(&config, &input, format, &json_out, &csv_out)?;
            println!(
                "Parsed {} products ({} skipped)",
                totals.normalized, totals.skipped
            );
        }
        Some(Commands::Import {
            input,
            store_dir,
            database,
            collection,
            batch_size,
        }) => {
            apply_store_overrides(&mut config, store_dir, database, collection, batch_size);
            import::run_import(&config, &input)?;
        }
        None => println!("catalog-cli: no command given (try --help)"),
    }

    Ok(())
}

/// Command-line store settings take precedence over the environment.
fn apply_store_overrides(
    config: &mut AppConfig,
    store_dir: Option<PathBuf>,
    database: Option<String>,
    collection: Option<String>,
    batch_size: Option<usize>,
) {
    if let Some(dir) = store_dir {
        config.store_dir = dir;
    }
    if let Some(database) = database {
        config.database = database;
    }
    if let Some(collection) = collection {
        config.collection = collection;
    }
    if let Some(size) = batch_size {
        config.import_batch_size = size.max(1);
    }
}
