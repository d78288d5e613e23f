//! Configuration

use std::path::PathBuf;

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Where the mock catalog and cart come from.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Directory holding `catalog/` and `carts/` fixture files
    #[arg(long, env = "HARVEST_FIXTURES", default_value = "./fixtures", global = true)]
    pub fixtures_dir: PathBuf,

    /// Catalog fixture name; the bundled Organic Harvest catalog when omitted
    #[arg(long, env = "HARVEST_CATALOG", global = true)]
    pub catalog: Option<String>,

    /// Cart fixture name used to seed the cart before checkout
    #[arg(long, env = "HARVEST_CART", global = true)]
    pub cart: Option<String>,
}
