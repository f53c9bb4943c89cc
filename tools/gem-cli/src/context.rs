//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use gem_catalog::catalog::{load_catalog_json, Gemstone};
use gem_observability::{LogFormat, LogLevel, SearchId, StructuredLogger};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["gem.toml", ".gem.toml", "gem.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Correlation id for this invocation.
    pub search_id: SearchId,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            search_id: SearchId::generate(),
        })
    }

    /// Find config file in directory tree.
    pub fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Catalog path from the command line, falling back to config.
    pub fn catalog_path(&self, override_path: Option<&str>) -> PathBuf {
        self.resolve_path(override_path.unwrap_or(&self.config.catalog.path))
    }

    /// Read and validate the catalog.
    pub fn load_catalog(&self, override_path: Option<&str>) -> Result<(Vec<Gemstone>, PathBuf)> {
        let path = self.catalog_path(override_path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        let gems = load_catalog_json(&content)
            .with_context(|| format!("Invalid catalog: {}", path.display()))?;
        Ok((gems, path))
    }

    /// Logger for a component, honoring `--verbose` and `[logging]`.
    pub fn logger(&self, component: &str) -> StructuredLogger {
        let level = if self.output.is_verbose() {
            LogLevel::Debug
        } else {
            LogLevel::from_str(&self.config.logging.level).unwrap_or(LogLevel::Warn)
        };
        let format = LogFormat::from_str(&self.config.logging.format).unwrap_or_default();

        StructuredLogger::new(self.search_id.clone())
            .with_component(format!("cli.{}", component))
            .with_min_level(level)
            .with_format(format)
    }
}
