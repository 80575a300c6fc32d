//! Configuration management for QuantumChain.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QCHAIN_` prefix)
//! 3. `.env` files
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::network::{self, NetworkConfig};

/// Complete configuration shared by the dashboard and the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QchainConfig {
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Chain and contract
    #[serde(default)]
    pub network: NetworkConfig,

    /// How the ledger is read and written
    #[serde(default)]
    pub ledger: LedgerSettings,

    /// Text-generation service
    #[serde(default)]
    pub ai: AiSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Dashboard HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (e.g. "127.0.0.1:3000")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// JSON file persisting registered users. In-memory when unset.
    #[serde(default)]
    pub users_file: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            users_file: None,
        }
    }
}

/// How job history is read from the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Scan `JobLogged` events over a bounded block window.
    #[default]
    Events,
    /// Call the `getAllJobs()` view.
    View,
}

impl FromStr for QueryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "events" => Ok(QueryMode::Events),
            "view" => Ok(QueryMode::View),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown query mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Events => write!(f, "events"),
            QueryMode::View => write!(f, "view"),
        }
    }
}

/// Ledger access settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    #[serde(default)]
    pub query_mode: QueryMode,

    /// Number of blocks scanned back from the latest one in events mode
    #[serde(default = "default_block_window")]
    pub block_window: u64,

    /// Hex secp256k1 key of the service account that signs `logJob`
    #[serde(default)]
    pub private_key: Option<String>,

    /// Seconds to wait for a transaction receipt
    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout_seconds: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            query_mode: QueryMode::default(),
            block_window: default_block_window(),
            private_key: None,
            receipt_timeout_seconds: default_receipt_timeout(),
        }
    }
}

impl fmt::Debug for LedgerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerSettings")
            .field("query_mode", &self.query_mode)
            .field("block_window", &self.block_window)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("receipt_timeout_seconds", &self.receipt_timeout_seconds)
            .finish()
    }
}

/// Text-generation service settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct AiSettings {
    /// Base URL of the generative language API
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            api_key: None,
        }
    }
}

impl fmt::Debug for AiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiSettings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_block_window() -> u64 {
    99_999
}

fn default_receipt_timeout() -> u64 {
    120
}

fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl QchainConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: QchainConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with full precedence handling.
    ///
    /// Reads `.env` if present, then the optional YAML file, then applies
    /// `QCHAIN_*` environment overrides and validates the result.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => QchainConfig::default(),
        };

        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn merge_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = lookup("QCHAIN_BIND") {
            self.server.bind_address = v;
        }
        if let Some(v) = lookup("QCHAIN_USERS_FILE") {
            self.server.users_file = Some(PathBuf::from(v));
        }

        // Network
        if let Some(v) = lookup("QCHAIN_CHAIN_ID") {
            self.network.chain_id = parse_chain_id(&v)?;
        }
        if let Some(v) = lookup("QCHAIN_RPC_URL") {
            self.network.rpc_url = v;
        }
        if let Some(v) = lookup("QCHAIN_EXPLORER_URL") {
            self.network.explorer_url = v;
        }
        if let Some(v) = lookup("QCHAIN_CONTRACT_ADDRESS") {
            self.network.contract_address = Address::parse(&v)
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        }

        // Ledger
        if let Some(v) = lookup("QCHAIN_QUERY_MODE") {
            self.ledger.query_mode = v.parse()?;
        }
        if let Some(v) = lookup("QCHAIN_BLOCK_WINDOW") {
            self.ledger.block_window = v.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("Invalid block window: {v}"))
            })?;
        }
        if let Some(v) = lookup("QCHAIN_PRIVATE_KEY").or_else(|| lookup("SERVICE_ACCOUNT_PRIVATE_KEY")) {
            self.ledger.private_key = Some(v);
        }

        // AI
        if let Some(v) = lookup("QCHAIN_AI_ENDPOINT") {
            self.ai.endpoint = v;
        }
        if let Some(v) = lookup("QCHAIN_AI_MODEL") {
            self.ai.model = v;
        }
        if let Some(v) = lookup("QCHAIN_AI_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.ai.api_key = Some(v);
        }

        // Logging
        if let Some(v) = lookup("QCHAIN_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("QCHAIN_LOG_FORMAT") {
            self.logging.format = v;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;

        if self.network.chain_id == 0 {
            return Err(ConfigError::ValidationError(
                "chain_id must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("rpc_url", &self.network.rpc_url),
            ("explorer_url", &self.network.explorer_url),
            ("ai.endpoint", &self.ai.endpoint),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be an http(s) URL: {url}"
                )));
            }
        }

        if self.ledger.block_window == 0 {
            return Err(ConfigError::ValidationError(
                "block_window must be greater than 0".to_string(),
            ));
        }

        if let Some(ref key) = self.ledger.private_key {
            if key.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "private_key must not be empty; omit it to disable on-chain writes".to_string(),
                ));
            }
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Get the parsed dashboard bind address.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "Invalid bind address: {}",
                self.server.bind_address
            ))
        })
    }
}

fn parse_chain_id(s: &str) -> Result<u64, ConfigError> {
    network::parse_chain_id(s)
        .ok_or_else(|| ConfigError::ValidationError(format!("Invalid chain id: {}", s.trim())))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
