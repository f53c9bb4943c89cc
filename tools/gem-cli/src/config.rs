//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Search defaults.
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Where the catalog comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a JSON array of gemstones.
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

fn default_catalog_path() -> String {
    "catalog.json".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Defaults for `gem search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results per page (1-100).
    #[serde(default = "default_per_page")]
    pub per_page: i64,

    /// Sort order, e.g. "featured" or "price_asc".
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Whether to print facet counts under the results.
    #[serde(default = "default_true")]
    pub facets: bool,
}

fn default_per_page() -> i64 {
    24
}

fn default_sort() -> String {
    "featured".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            sort: default_sort(),
            facets: true,
        }
    }
}

/// Structured log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn, error.
    #[serde(default = "default_level")]
    pub level: String,

    /// Line format: json or human.
    #[serde(default = "default_format")]
    pub format: String,

    /// Print phase timings after each search.
    #[serde(default)]
    pub metrics: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "human".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            metrics: false,
        }
    }
}

/// Generate a default gem.toml config file.
pub fn generate_default_config(catalog_path: &str) -> String {
    format!(
        r#"# GemVault search configuration

[catalog]
path = "{catalog_path}"

[search]
per_page = 24
# featured, price_asc, price_desc, name_asc, name_desc, weight_asc, weight_desc
sort = "featured"
facets = true

[logging]
# trace, debug, info, warn, error
level = "warn"
# json or human
format = "human"
metrics = false
"#,
        catalog_path = catalog_path
    )
}
