//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: `Default` implementations and `serde` defaults
//! 2. **Config file**: TOML file specified by the `REGISTRAR_CONFIG` env var
//! 3. **Environment variables**: `REGISTRAR__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`RpcConfig`]: node URL, timeouts, concurrency and the acting account
//! - [`RegistryConfig`]: ENS registry address, default tld, interface ids, DNS tlds
//! - [`TransactionConfig`]: private network threshold and gas multiplier
//! - [`LoggingConfig`]: log level and format
//!
//! # Example
//!
//! ```toml
//! [rpc]
//! url = "http://127.0.0.1:8545"
//! timeout_seconds = 10
//!
//! [registry]
//! default_tld = "eth"
//! dns_tlds = ["xyz", "art"]
//!
//! [transaction]
//! private_network_max_id = 1000
//! gas_multiplier = 2
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

pub use crate::transaction::TransactionConfig;
use crate::{
    registry::RegistrarInterfaces,
    rpc::HttpClientConfig,
    types::{Address, InterfaceId},
};

/// Mainnet deployment of the ENS registry.
pub const DEFAULT_ENS_REGISTRY: Address = Address([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97,
    0xba, 0x6c, 0x7d, 0x2e, 0x1e,
]);

/// JSON-RPC node connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// HTTP(S) endpoint of the node. Defaults to `http://127.0.0.1:8545`.
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Per-request timeout in seconds. Defaults to `30`.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum in-flight requests to the node. Defaults to `64`.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Account that signs submitted transactions. Defaults to the node's first account.
    #[serde(default)]
    pub account: Option<Address>,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_concurrent_requests() -> usize {
    64
}

/// Where registrar contracts are discovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// ENS registry address.
    #[serde(default = "default_ens_registry")]
    pub ens_registry: Address,

    /// Tld used when none is given. Defaults to `"eth"`.
    #[serde(default = "default_tld")]
    pub default_tld: String,

    /// Interface id of the legacy auction registrar on the tld resolver.
    #[serde(default = "default_legacy_interface")]
    pub legacy_registrar_interface: InterfaceId,

    /// Interface id of the registration controller on the tld resolver.
    #[serde(default = "default_permanent_interface")]
    pub permanent_registrar_interface: InterfaceId,

    /// Tlds served by the DNS registrar. Defaults to `["xyz", "art"]`.
    #[serde(default = "default_dns_tlds")]
    pub dns_tlds: Vec<String>,
}

fn default_ens_registry() -> Address {
    DEFAULT_ENS_REGISTRY
}

fn default_tld() -> String {
    "eth".to_string()
}

fn default_legacy_interface() -> InterfaceId {
    RegistrarInterfaces::default().legacy_registrar
}

fn default_permanent_interface() -> InterfaceId {
    RegistrarInterfaces::default().permanent_registrar
}

fn default_dns_tlds() -> Vec<String> {
    vec!["xyz".to_string(), "art".to_string()]
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Root configuration.
///
/// Loaded with the `REGISTRAR` prefix for environment overrides using `__` as a separator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rpc: RpcConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub transaction: TransactionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            timeout_seconds: default_timeout_seconds(),
            max_concurrent_requests: default_max_concurrent_requests(),
            account: None,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ens_registry: DEFAULT_ENS_REGISTRY,
            default_tld: default_tld(),
            legacy_registrar_interface: default_legacy_interface(),
            permanent_registrar_interface: default_permanent_interface(),
            dns_tlds: default_dns_tlds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// Use `__` as a separator for nested fields (e.g., `REGISTRAR__RPC__URL=http://node:8545`).
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("rpc.url", default_rpc_url())?
            .set_default("rpc.timeout_seconds", default_timeout_seconds())?
            .set_default("registry.default_tld", default_tld())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("REGISTRAR").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/registrar.toml`, or the file named by
    /// `REGISTRAR_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("REGISTRAR_CONFIG")
            .unwrap_or_else(|_| "config/registrar.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_seconds)
    }

    /// HTTP transport settings derived from the `rpc` section.
    #[must_use]
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            concurrent_limit: self.rpc.max_concurrent_requests,
            ..HttpClientConfig::default()
        }
    }

    #[must_use]
    pub fn registrar_interfaces(&self) -> RegistrarInterfaces {
        RegistrarInterfaces {
            legacy_registrar: self.registry.legacy_registrar_interface,
            permanent_registrar: self.registry.permanent_registrar_interface,
        }
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if !self.rpc.url.starts_with("http") {
            return Err(format!("Invalid RPC URL: {}", self.rpc.url));
        }

        if self.rpc.timeout_seconds == 0 {
            return Err("RPC timeout must be greater than 0".to_string());
        }

        if self.rpc.max_concurrent_requests == 0 {
            return Err("Max concurrent requests must be greater than 0".to_string());
        }

        if self.registry.ens_registry.is_zero() {
            return Err("ENS registry address must not be zero".to_string());
        }

        if self.registry.default_tld.is_empty() || self.registry.default_tld.contains('.') {
            return Err(format!("Invalid default tld: {:?}", self.registry.default_tld));
        }

        if self.transaction.gas_multiplier == 0 {
            return Err("Gas multiplier must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }
}
