//! Configuration System
//!
//! Layered configuration for the store connection and logging. Values come
//! from built-in defaults, the user's global config file, workspace config
//! files and the environment, in that order of increasing precedence.

use crate::logging::LoggingConfig;
use crate::vault::KvVersion;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

pub const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";
pub const DEFAULT_MOUNT: &str = "secret";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultwalkConfig {
    /// Store connection settings
    #[serde(default)]
    pub vault: VaultConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection to the secrets store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Server address, scheme included
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Access token; usually supplied through `VAULT_TOKEN`
    #[serde(default)]
    pub token: Option<String>,

    /// Enterprise namespace sent as `X-Vault-Namespace`
    #[serde(default)]
    pub namespace: Option<String>,

    /// KV engine mount point
    #[serde(default = "default_mount")]
    pub mount: String,

    #[serde(default)]
    pub kv_version: KvVersion,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra PEM or DER root certificate
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,

    #[serde(default)]
    pub insecure_skip_tls: bool,
}

fn default_addr() -> String {
    DEFAULT_VAULT_ADDR.to_string()
}

fn default_mount() -> String {
    DEFAULT_MOUNT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            token: None,
            namespace: None,
            mount: default_mount(),
            kv_version: KvVersion::default(),
            timeout_secs: default_timeout_secs(),
            ca_bundle: None,
            insecure_skip_tls: false,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Vault(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Vault(msg) => write!(f, "Vault: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl VaultConfig {
    /// Validate connection settings
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let addr = self.addr.trim();
        if addr.is_empty() {
            errors.push("Address cannot be empty".to_string());
        } else if !addr.starts_with("http://") && !addr.starts_with("https://") {
            errors.push(format!(
                "Address '{}' must start with http:// or https://",
                addr
            ));
        }

        if self.mount.trim_matches('/').is_empty() {
            errors.push("Mount cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            errors.push("Timeout must be greater than zero".to_string());
        }

        if let Some(path) = &self.ca_bundle {
            if !path.exists() {
                errors.push(format!("CA bundle {} does not exist", path.display()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl VaultwalkConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(vault_errors) = self.vault.validate() {
            errors.extend(vault_errors.into_iter().map(ValidationError::Vault));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
