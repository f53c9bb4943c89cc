//! CLI command implementations.

pub mod config;
pub mod criteria;
pub mod domains;
pub mod search;

use clap::{Args, Subcommand};

/// Catalog selection shared by several commands.
#[derive(Args)]
pub struct CatalogArgs {
    /// Catalog file (default: `[catalog] path` from config).
    #[arg(long)]
    pub catalog: Option<String>,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Start from a criteria or saved-search JSON file.
    #[arg(long)]
    pub criteria: Option<String>,

    /// Free-text search over name, description, category and color.
    #[arg(short, long)]
    pub query: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub origin: Option<String>,

    /// Gemstone kind: cut or rough.
    #[arg(long = "type")]
    pub kind: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    /// "untreated" or a treatment type such as "heated".
    #[arg(long)]
    pub treatment: Option<String>,

    /// "certified", "uncertified" or a lab name.
    #[arg(long)]
    pub certification: Option<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum weight (carats for cut, grams for rough).
    #[arg(long)]
    pub min_weight: Option<f64>,

    /// Maximum weight (carats for cut, grams for rough).
    #[arg(long)]
    pub max_weight: Option<f64>,

    /// Minimum length in millimeters.
    #[arg(long)]
    pub min_length: Option<f64>,

    #[arg(long)]
    pub max_length: Option<f64>,

    #[arg(long)]
    pub min_width: Option<f64>,

    #[arg(long)]
    pub max_width: Option<f64>,

    #[arg(long)]
    pub min_height: Option<f64>,

    #[arg(long)]
    pub max_height: Option<f64>,

    #[arg(long)]
    pub min_yield: Option<f64>,

    #[arg(long)]
    pub max_yield: Option<f64>,

    #[arg(long)]
    pub clarity: Option<String>,

    #[arg(long)]
    pub cut_quality: Option<String>,

    #[arg(long)]
    pub color_grade: Option<String>,

    #[arg(long)]
    pub symmetry: Option<String>,

    #[arg(long)]
    pub polish: Option<String>,

    #[arg(long)]
    pub color_intensity: Option<String>,

    #[arg(long)]
    pub crystal_quality: Option<String>,

    #[arg(long)]
    pub transparency: Option<String>,

    /// Only items in stock.
    #[arg(long)]
    pub in_stock: bool,

    /// Only items with at least one video.
    #[arg(long)]
    pub has_videos: bool,

    /// Only certified items with a certificate link.
    #[arg(long)]
    pub has_certificates: bool,

    /// Sort order (featured, price_asc, price_desc, name_asc, name_desc, weight_asc, weight_desc).
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Page number (1-indexed).
    #[arg(short, long, default_value = "1")]
    pub page: i64,

    /// Results per page.
    #[arg(long)]
    pub per_page: Option<i64>,
}

/// Arguments for the criteria command.
#[derive(Args)]
pub struct CriteriaArgs {
    #[command(subcommand)]
    pub command: CriteriaCommand,
}

#[derive(Subcommand)]
pub enum CriteriaCommand {
    /// Write criteria that match the whole catalog.
    Init {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output file.
        #[arg(short, long, default_value = "criteria.json")]
        output: String,

        /// Overwrite without asking.
        #[arg(short, long)]
        force: bool,
    },
    /// Check a criteria file for malformed ranges.
    Validate {
        /// Criteria or saved-search file.
        file: String,
    },
    /// List the filters a criteria file activates.
    Show {
        /// Criteria or saved-search file.
        file: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Wrap a criteria file into a named saved search.
    Save {
        /// Name of the saved search.
        name: String,

        /// Criteria file to save.
        #[arg(long)]
        from: String,

        /// Output file (default: <name>.search.json).
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite without asking.
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
