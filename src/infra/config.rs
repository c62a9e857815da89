//! Configuration management infrastructure.
//!
//! The signer runs fine without any configuration file. A TOML file can
//! override the cryptographic provider the token registers, the digest
//! algorithm and the default log level.

use crate::domain::constants;
use crate::infra::error::{SigningError, SigningResult};
use crate::HashAlgorithm;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "ETOKENSIGN_CONFIG";

/// Signer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfiguration {
    /// Name of the cryptographic service provider backing the token
    pub provider_name: String,

    /// CryptoAPI provider type (`PROV_RSA_FULL` for eToken)
    pub provider_type: u32,

    /// Acquire the provider context without any provider UI
    pub silent: bool,

    /// Digest algorithm for the Authenticode signature
    pub hash_algorithm: String,

    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for SignerConfiguration {
    fn default() -> Self {
        Self {
            provider_name: constants::ETOKEN_BASE_CRYPT_PROV_NAME.to_string(),
            provider_type: constants::PROV_RSA_FULL,
            silent: true,
            hash_algorithm: HashAlgorithm::Sha256.as_str().to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl SignerConfiguration {
    /// Parsed digest algorithm.
    pub fn hash_algorithm(&self) -> SigningResult<HashAlgorithm> {
        self.hash_algorithm.parse::<HashAlgorithm>().map_err(|_| {
            SigningError::ConfigurationError(format!(
                "Invalid hash algorithm: {}",
                self.hash_algorithm
            ))
        })
    }

    /// Parsed default log level.
    pub fn log_level(&self) -> SigningResult<LevelFilter> {
        LevelFilter::from_str(&self.log_level).map_err(|_| {
            SigningError::ConfigurationError(format!("Invalid log level: {}", self.log_level))
        })
    }

    /// Check every value before the configuration is used.
    pub fn validate(&self) -> SigningResult<()> {
        if self.provider_name.trim().is_empty() {
            return Err(SigningError::ConfigurationError(
                "Provider name must not be empty".to_string(),
            ));
        }
        if self.provider_name.contains('\0') {
            return Err(SigningError::ConfigurationError(
                "Provider name must not contain NUL characters".to_string(),
            ));
        }
        if self.provider_type == 0 {
            return Err(SigningError::ConfigurationError(
                "Provider type must be greater than 0".to_string(),
            ));
        }
        self.hash_algorithm()?;
        self.log_level()?;
        Ok(())
    }
}

/// Locates and loads the configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Resolve the path from `ETOKENSIGN_CONFIG`, else the user config dir.
    pub fn new() -> Self {
        let config_path = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);
        Self { config_path }
    }

    /// Create a configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("etoken-signer").join("config.toml")
        } else {
            PathBuf::from("etoken-signer-config.toml")
        }
    }

    /// Load the file if present, otherwise fall back to defaults.
    pub fn load_or_default(&self) -> SigningResult<SignerConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::debug!(
                "No configuration file at {}, using defaults",
                self.config_path.display()
            );
            Ok(SignerConfiguration::default())
        }
    }

    /// Load configuration from file
    pub fn load(&self) -> SigningResult<SignerConfiguration> {
        log::debug!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            SigningError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: SignerConfiguration = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
