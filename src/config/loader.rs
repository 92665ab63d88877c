//! Configuration loading and merging logic
//!
//! Handles loading configuration from the config file and environment and
//! merging them according to precedence rules.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable overriding `admissionNamespace`
pub const ENV_ADMISSION_NAMESPACE: &str = "KONFLUXCTL_ADMISSION_NAMESPACE";
/// Environment variable overriding `outputFormat`
pub const ENV_OUTPUT_FORMAT: &str = "KONFLUXCTL_OUTPUT_FORMAT";
/// Environment variable overriding `context`
pub const ENV_CONTEXT: &str = "KONFLUXCTL_CONTEXT";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    ///
    /// Command line flags are applied on top by the caller.
    pub fn load() -> Result<Config> {
        let config = Self::load_from(&paths::root_config_path())?;
        Ok(Self::apply_env_overrides(config))
    }

    /// Load the file at `path`, or defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::load_defaults());
        }
        Self::load_file(path)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file is a valid, all-defaults configuration
        if contents.trim().is_empty() {
            return Ok(Self::load_defaults());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    fn apply_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(namespace) = var(ENV_ADMISSION_NAMESPACE).filter(|ns| !ns.is_empty()) {
            config.admission_namespace = namespace;
        }

        if let Some(format) = var(ENV_OUTPUT_FORMAT) {
            match format.parse() {
                Ok(format) => config.output_format = format,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_OUTPUT_FORMAT, e),
            }
        }

        if let Some(context) = var(ENV_CONTEXT).filter(|ctx| !ctx.is_empty()) {
            config.context = Some(context);
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
