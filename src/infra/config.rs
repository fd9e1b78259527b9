//! Configuration management infrastructure.
//!
//! Persists verifier preferences in a TOML file: the certificates the trust
//! store is populated from, the groups attached to each, and reporting
//! options used by the command line tool.

use crate::infra::error::{Pkcs7Error, Pkcs7Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Verifier configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfiguration {
    /// Certificates loaded into the trust store
    #[serde(default)]
    pub trusted_certificates: Vec<TrustedCertificateConfig>,

    /// Whether to show verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Treat a container as valid only if every signer verifies
    #[serde(default)]
    pub require_all_signers: bool,
}

/// One trusted certificate file (PEM bundle or single DER certificate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedCertificateConfig {
    /// Path to the certificate file
    pub path: PathBuf,

    /// Group memberships granted to signers verified by these certificates
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with default path
    pub fn new() -> Pkcs7Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Create a configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Pkcs7Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("pkcs7-verifier").join("config.toml"))
        } else {
            Ok(PathBuf::from("pkcs7-verifier-config.toml"))
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default(&self) -> Pkcs7Result<VerifierConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = VerifierConfiguration::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    /// Load configuration from file
    pub fn load(&self) -> Pkcs7Result<VerifierConfiguration> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            Pkcs7Error::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: VerifierConfiguration = toml::from_str(&content).map_err(|e| {
            Pkcs7Error::ConfigurationError(format!("Failed to parse config file: {e}"))
        })?;

        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &VerifierConfiguration) -> Pkcs7Result<()> {
        Self::validate_config(config)?;
        log::info!("Saving configuration to: {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Pkcs7Error::ConfigurationError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            Pkcs7Error::ConfigurationError(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(&self.config_path, content).map_err(|e| {
            Pkcs7Error::ConfigurationError(format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        log::info!("Configuration saved successfully");
        Ok(())
    }

    /// Validate configuration values
    fn validate_config(config: &VerifierConfiguration) -> Pkcs7Result<()> {
        for entry in &config.trusted_certificates {
            if entry.path.as_os_str().is_empty() {
                return Err(Pkcs7Error::ConfigurationError(
                    "Trusted certificate path must not be empty".to_string(),
                ));
            }
            if let Some(group) = entry.groups.iter().find(|g| g.trim().is_empty()) {
                return Err(Pkcs7Error::ConfigurationError(format!(
                    "Invalid group name {group:?} for {}",
                    entry.path.display()
                )));
            }
        }
        Ok(())
    }

    /// Update a specific configuration value
    pub fn update_value(&self, key: &str, value: &str) -> Pkcs7Result<()> {
        let mut config = self.load()?;
        let parse_bool = |value: &str| {
            value.parse::<bool>().map_err(|_| {
                Pkcs7Error::ConfigurationError(format!("Invalid boolean value: {value}"))
            })
        };

        match key {
            "verbose" => config.verbose = parse_bool(value)?,
            "require_all_signers" => config.require_all_signers = parse_bool(value)?,
            _ => {
                return Err(Pkcs7Error::ConfigurationError(format!(
                    "Unknown configuration key: {key}"
                )));
            }
        }

        self.save(&config)
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}
