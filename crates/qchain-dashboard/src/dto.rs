//! Data Transfer Objects for the dashboard API.
//!
//! These types bridge QuantumChain domain structures to JSON request and
//! response bodies.

use chrono::{DateTime, Utc};
use qchain_core::{
    Address, AnalysisResult, Estimate, JobRecord, NetworkConfig, SessionUser, SubmissionType,
};
use qchain_core::network::{NativeCurrency, parse_chain_id};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status (always "ok" if responding).
    pub status: String,
    /// Dashboard version.
    pub version: String,
    /// Ledger backend name.
    pub ledger: String,
    /// Text-generation model.
    pub model: String,
}

// ============================================================================
// Auth DTOs
// ============================================================================

/// Login or registration credentials.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user: SessionUser,
}

/// Successful registration. The new user still has to log in.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: SessionUser,
}

/// Current session.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: SessionUser,
    pub wallet: Option<Address>,
    pub logged_in_at: DateTime<Utc>,
}

// ============================================================================
// Wallet DTOs
// ============================================================================

/// Chain id as a wallet reports it: a number or a `0x` hex string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChainIdInput {
    Number(u64),
    Text(String),
}

impl ChainIdInput {
    pub fn value(&self) -> Result<u64, ApiError> {
        match self {
            ChainIdInput::Number(n) => Ok(*n),
            ChainIdInput::Text(s) => parse_chain_id(s)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid chain id: {s}"))),
        }
    }
}

/// Connect a wallet to the session.
#[derive(Debug, Deserialize)]
pub struct ConnectWalletRequest {
    pub address: String,
    pub chain_id: ChainIdInput,
}

/// Wallet connection status.
#[derive(Debug, Serialize)]
pub struct WalletStatus {
    pub connected: bool,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub chain_id_hex: Option<String>,
    /// Chain the dashboard writes to.
    pub expected_chain_id: u64,
    pub expected_chain_id_hex: String,
    /// The wallet is on another chain and must switch before submitting.
    pub requires_switch: bool,
    /// Native balance in whole units, when a node is configured.
    pub balance: Option<String>,
    pub currency_symbol: String,
    /// Explorer page for the connected address.
    pub explorer_url: Option<String>,
}

impl WalletStatus {
    /// Status with no wallet connected.
    pub fn disconnected(network: &NetworkConfig) -> Self {
        Self {
            connected: false,
            address: None,
            chain_id: None,
            chain_id_hex: None,
            expected_chain_id: network.chain_id,
            expected_chain_id_hex: network.chain_id_hex(),
            requires_switch: false,
            balance: None,
            currency_symbol: network.native_currency.symbol.clone(),
            explorer_url: None,
        }
    }
}

// ============================================================================
// Estimate DTOs
// ============================================================================

/// Estimation input: the form's current provider and text.
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Optional priority multiplier.
    #[serde(default)]
    pub priority: Option<f64>,
}

/// Estimation output.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    /// Time range shown next to the form.
    pub time: String,
    /// Cost range, absent while the form is incomplete.
    pub cost: Option<String>,
    /// Whether the provider has its own profile rather than the default.
    pub known_provider: bool,
    /// Raw numbers, absent while the form is incomplete.
    pub estimate: Option<Estimate>,
}

// ============================================================================
// Job DTOs
// ============================================================================

/// Query parameters for listing jobs.
#[derive(Debug, Default, Deserialize)]
pub struct JobListParams {
    /// Admin toggle: show only jobs from the connected wallet.
    #[serde(default)]
    pub mine: bool,
}

/// A history entry.
#[derive(Debug, Serialize)]
pub struct JobView {
    /// Short label derived from the transaction hash.
    pub id: String,
    pub title: String,
    pub job_type: String,
    pub description: String,
    /// The stored payload is a JSON object rather than plain text.
    pub structured: bool,
    pub submitter: Address,
    pub submitted_at: DateTime<Utc>,
    pub tx_hash: String,
    /// Explorer link, when the transaction hash is known.
    pub tx_url: Option<String>,
    pub analysis: Option<AnalysisResult>,
}

impl JobView {
    pub fn from_record(record: JobRecord, network: &NetworkConfig) -> Self {
        let tx_url = (!record.tx_hash.is_empty()).then(|| network.tx_url(&record.tx_hash));
        Self {
            id: record.display_id(),
            title: record.display_title(),
            description: record.payload.summary(),
            structured: record.payload.is_structured(),
            job_type: record.job_type,
            submitter: record.submitter,
            submitted_at: record.submitted_at,
            tx_hash: record.tx_hash,
            tx_url,
            analysis: record.analysis,
        }
    }
}

/// Job history. A failed ledger read yields no jobs and an inline `error`.
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobView>,
    pub total: usize,
    pub error: Option<String>,
}

/// Request to log a new job.
#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    pub job_type: String,
    pub description: String,
    #[serde(default)]
    pub submission_type: SubmissionType,
    /// Run AI analysis before logging. Defaults to true.
    #[serde(default = "default_true")]
    pub analyse: bool,
}

fn default_true() -> bool {
    true
}

/// Outcome of a logged job.
#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub tx_hash: String,
    pub tx_url: String,
    /// Account that sent the transaction.
    pub from: Address,
    /// Wallet the job is logged for.
    pub submitter: Address,
    pub block_number: Option<u64>,
    /// Title written to the ledger.
    pub title: String,
    /// Description written to the ledger.
    pub description: String,
    pub analysis: Option<AnalysisResult>,
}

// ============================================================================
// Chat, stats and network DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Admin dashboard counters.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_jobs: usize,
    pub total_users: usize,
}

/// Contract deployment details.
#[derive(Debug, Serialize)]
pub struct ContractResponse {
    pub address: Address,
    pub chain_id: u64,
    pub chain_id_hex: String,
    pub chain_name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    /// Explorer page of the contract.
    pub contract_url: String,
    pub native_currency: NativeCurrency,
    /// How the history is read: "events" or "view".
    pub query_mode: String,
}

/// Explorer throughput. `tps` is null when the explorer is unreachable.
#[derive(Debug, Serialize)]
pub struct TpsResponse {
    pub tps: Option<f64>,
}
