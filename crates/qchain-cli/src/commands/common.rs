//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use qchain_ai::GeminiClient;
use qchain_core::{QchainConfig, SessionStore, SessionUser, StoredSession, UserDirectory};
use qchain_ledger::ContractLedger;

/// Where the job description comes from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Read the description or QASM from a file
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Description or QASM given inline
    #[arg(short, long)]
    pub text: Option<String>,
}

impl InputArgs {
    /// Resolve the input text. A missing input is an empty string.
    pub fn read(&self) -> Result<String> {
        match (&self.input, &self.text) {
            (Some(path), _) => read_input(path),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Ok(String::new()),
        }
    }
}

/// Read a description or QASM file.
pub fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Configuration plus the session remembered between invocations.
pub struct Context {
    pub config: QchainConfig,
    pub store: SessionStore,
}

impl Context {
    pub fn load(config_file: Option<&Path>, session_file: Option<PathBuf>) -> Result<Self> {
        let config = QchainConfig::load(config_file).context("Failed to load configuration")?;
        let store = SessionStore::new(session_file.unwrap_or_else(SessionStore::default_path));
        Ok(Self { config, store })
    }

    pub fn session(&self) -> StoredSession {
        self.store.load()
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        self.store
            .save(session)
            .with_context(|| format!("Failed to write session: {}", self.store.path().display()))
    }

    /// User directory: the configured users file or `~/.qchain/users.json`.
    pub fn users(&self) -> Result<UserDirectory> {
        let path = match &self.config.server.users_file {
            Some(path) => path.clone(),
            None => default_state_dir()?.join("users.json"),
        };
        UserDirectory::open(&path)
            .with_context(|| format!("Failed to open user directory: {}", path.display()))
    }

    pub fn generator(&self) -> Result<GeminiClient> {
        GeminiClient::from_settings(&self.config.ai).map_err(|e| anyhow::anyhow!("{e}"))
    }

    pub fn ledger(&self) -> Result<ContractLedger> {
        ContractLedger::connect(&self.config.network, &self.config.ledger)
            .map_err(|e| anyhow::anyhow!("Failed to connect to {}: {e}", self.config.network.rpc_url))
    }
}

/// The logged-in user, or an error telling how to log in.
pub fn require_user(session: &StoredSession) -> Result<&SessionUser> {
    session
        .user
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run 'qchain auth login' first."))
}

/// Return the default QuantumChain state directory (~/.qchain/).
pub fn default_state_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let state_dir = home.join(".qchain");
    if !state_dir.exists() {
        fs::create_dir_all(&state_dir).with_context(|| {
            format!("Failed to create state directory: {}", state_dir.display())
        })?;
    }
    Ok(state_dir)
}

/// Ticking spinner for network calls.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
