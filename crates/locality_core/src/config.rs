//! Registry configuration.
//!
//! # Responsibility
//! - Describe where the locality database lives and how it is pooled.
//! - Resolve overrides from `LOCALITY_*` environment variables.
//!
//! # Invariants
//! - Pool size and checkout timeout are never zero.
//! - Blank environment values fall back to defaults.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

/// Default database file, relative to the process working directory.
pub const DEFAULT_DB_PATH: &str = "./villes_cameroun.db";
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

pub const ENV_DB_PATH: &str = "LOCALITY_DB_PATH";
pub const ENV_POOL_SIZE: &str = "LOCALITY_POOL_SIZE";
pub const ENV_CHECKOUT_TIMEOUT_MS: &str = "LOCALITY_CHECKOUT_TIMEOUT_MS";

/// Backing storage for a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    /// Private in-memory database. Pooled as a single connection.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub storage: StorageLocation,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// How long a checkout waits for a free connection.
    pub checkout_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    MustBePositive(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be an unsigned integer, got `{value}`")
            }
            Self::MustBePositive(key) => write!(f, "{key} must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::file(DEFAULT_DB_PATH)
    }
}

impl RegistryConfig {
    /// File-backed config with default pool settings.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageLocation::File(path.into()),
            pool_size: DEFAULT_POOL_SIZE,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            storage: StorageLocation::Memory,
            pool_size: 1,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// # Errors
    /// - Returns `InvalidNumber` when a numeric value does not parse.
    /// - Returns `MustBePositive` when a numeric value is zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_blank(lookup(ENV_DB_PATH)) {
            config.storage = StorageLocation::File(PathBuf::from(path));
        }
        if let Some(size) = non_blank(lookup(ENV_POOL_SIZE)) {
            let parsed = parse_positive(ENV_POOL_SIZE, &size)?;
            config.pool_size = u32::try_from(parsed).map_err(|_| ConfigError::InvalidNumber {
                key: ENV_POOL_SIZE,
                value: size.clone(),
            })?;
        }
        if let Some(timeout_ms) = non_blank(lookup(ENV_CHECKOUT_TIMEOUT_MS)) {
            let millis = parse_positive(ENV_CHECKOUT_TIMEOUT_MS, &timeout_ms)?;
            config.checkout_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Effective pool size. In-memory storage always uses one connection.
    pub fn effective_pool_size(&self) -> u32 {
        match self.storage {
            StorageLocation::File(_) => self.pool_size.max(1),
            StorageLocation::Memory => 1,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    let parsed = value
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })?;

    if parsed == 0 {
        return Err(ConfigError::MustBePositive(key));
    }
    Ok(parsed)
}
