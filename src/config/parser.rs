use crate::config::types::{Config, SeedConfig};
use crate::config::validation::{validate, validate_start_url};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_mirror::config::load_config;
///
/// let config = load_config(Path::new("mirror.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that two runs into the same output directory can be
/// told apart by the configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

impl SeedConfig {
    /// Builds the immutable seed of a crawl
    ///
    /// # Arguments
    ///
    /// * `start_url` - The seed URL; its host becomes the crawl scope
    /// * `output_directory` - Root directory for mirrored files
    /// * `config` - Crawler and user agent settings
    ///
    /// # Returns
    ///
    /// * `Ok(SeedConfig)` - All settings are valid
    /// * `Err(ConfigError)` - The URL or one of the settings is invalid
    pub fn new(
        start_url: &str,
        output_directory: impl Into<PathBuf>,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let start_url = validate_start_url(start_url)?;
        validate(&config)?;

        let output_directory = output_directory.into();
        if output_directory.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output directory cannot be empty".to_string(),
            ));
        }

        Ok(Self::from_parts(start_url, output_directory, config))
    }
}
