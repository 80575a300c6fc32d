//! The job ledger abstraction and its implementations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qchain_core::{Address, JobPayload, JobRecord, LedgerSettings, NetworkConfig, QueryMode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::abi::{self, JOB_LOGGED_SIGNATURE, JobLoggedEvent};
use crate::error::{LedgerError, LedgerResult};
use crate::rpc::JsonRpcClient;
use crate::signer::{LegacyTransaction, LocalSigner};

/// Interval between receipt polls.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Headroom added on top of `eth_estimateGas`, in percent.
const GAS_HEADROOM_PERCENT: u64 = 20;

/// Outcome of a successful `logJob` write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: String,
    /// Block the transaction was mined in, when known.
    pub block_number: Option<u64>,
    /// Account that sent the transaction.
    pub from: Address,
}

/// Append-only job log.
///
/// `fetch_jobs` returns the full bounded history, newest first.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Short name for logs and status output.
    fn name(&self) -> &str;

    /// Account used for writes, if any.
    fn submitter(&self) -> Option<Address>;

    /// Record one job. Blocks until the transaction is mined.
    async fn log_job(&self, job_type: &str, description: &str) -> LedgerResult<TxReceipt>;

    /// All visible job records, newest first.
    async fn fetch_jobs(&self) -> LedgerResult<Vec<JobRecord>>;

    /// Number of visible job records.
    async fn job_count(&self) -> LedgerResult<usize> {
        Ok(self.fetch_jobs().await?.len())
    }
}

/// Gas limit for an `eth_estimateGas` result. Saturates on absurd estimates.
fn gas_with_headroom(estimate: u64) -> u64 {
    estimate.saturating_add(estimate.saturating_mul(GAS_HEADROOM_PERCENT) / 100)
}

fn timestamp(secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .unwrap_or_default()
}

fn into_record(event: JobLoggedEvent, tx_hash: String, relayer: Option<&Address>) -> JobRecord {
    let record = JobRecord::new(
        event.user,
        event.job_type,
        JobPayload::parse(&event.ipfs_hash),
        timestamp(event.time_submitted),
        tx_hash,
    );
    match relayer {
        Some(relayer) => record.relayed_by(relayer),
        None => record,
    }
}

/// Ledger backed by the job-logger contract on an EVM chain.
#[derive(Debug)]
pub struct ContractLedger {
    rpc: JsonRpcClient,
    contract: Address,
    chain_id: u64,
    query_mode: QueryMode,
    block_window: u64,
    signer: Option<LocalSigner>,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl ContractLedger {
    /// Build from network and ledger settings. The signing key is optional;
    /// without it the ledger is read-only.
    pub fn new(
        rpc: JsonRpcClient,
        network: &NetworkConfig,
        settings: &LedgerSettings,
    ) -> LedgerResult<Self> {
        let signer = settings
            .private_key
            .as_deref()
            .map(LocalSigner::from_hex)
            .transpose()?;

        if let Some(ref s) = signer {
            info!(address = %s.address(), "Loaded service account");
        }

        Ok(Self {
            rpc,
            contract: network.contract_address.clone(),
            chain_id: network.chain_id,
            query_mode: settings.query_mode,
            block_window: settings.block_window,
            signer,
            receipt_timeout: Duration::from_secs(settings.receipt_timeout_seconds),
            poll_interval: RECEIPT_POLL_INTERVAL,
        })
    }

    /// Build an HTTP-backed ledger.
    pub fn connect(network: &NetworkConfig, settings: &LedgerSettings) -> LedgerResult<Self> {
        Self::new(JsonRpcClient::http(&network.rpc_url)?, network, settings)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn rpc(&self) -> &JsonRpcClient {
        &self.rpc
    }

    pub fn query_mode(&self) -> QueryMode {
        self.query_mode
    }

    async fn fetch_from_events(&self) -> LedgerResult<Vec<JobRecord>> {
        let latest = self.rpc.block_number().await?;
        let from = latest.saturating_sub(self.block_window);
        let logs = self
            .rpc
            .get_logs(
                &self.contract,
                &abi::event_topic(JOB_LOGGED_SIGNATURE),
                from,
                latest,
            )
            .await?;

        let relayer = self.signer.as_ref().map(LocalSigner::address);
        let mut records = Vec::with_capacity(logs.len());
        for log in logs {
            match abi::decode_job_logged(&log.topics, &log.data) {
                Ok(event) => {
                    records.push(into_record(
                        event,
                        log.transaction_hash.unwrap_or_default(),
                        relayer,
                    ));
                }
                Err(e) => warn!(error = %e, "Skipping undecodable JobLogged log"),
            }
        }
        // Logs come back oldest first.
        records.reverse();
        Ok(records)
    }

    async fn fetch_from_view(&self) -> LedgerResult<Vec<JobRecord>> {
        let data = self
            .rpc
            .call(&self.contract, &abi::encode_get_all_jobs())
            .await?;
        let relayer = self.signer.as_ref().map(LocalSigner::address);
        let mut records: Vec<JobRecord> = abi::decode_all_jobs(&data)?
            .into_iter()
            .map(|event| into_record(event, String::new(), relayer))
            .collect();
        records.reverse();
        Ok(records)
    }

    async fn wait_for_receipt(&self, tx_hash: &str, from: &Address) -> LedgerResult<TxReceipt> {
        let deadline = Instant::now() + self.receipt_timeout;
        loop {
            if let Some(receipt) = self.rpc.transaction_receipt(tx_hash).await? {
                if !receipt.succeeded() {
                    return Err(LedgerError::Reverted(tx_hash.to_string()));
                }
                let block_number = receipt
                    .block_number
                    .as_deref()
                    .and_then(|b| crate::rpc::parse_quantity(b).ok())
                    .and_then(|b| u64::try_from(b).ok());
                return Ok(TxReceipt {
                    tx_hash: receipt.transaction_hash,
                    block_number,
                    from: from.clone(),
                });
            }
            if Instant::now() >= deadline {
                return Err(LedgerError::ReceiptTimeout(tx_hash.to_string()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl Ledger for ContractLedger {
    fn name(&self) -> &str {
        "contract"
    }

    fn submitter(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address().clone())
    }

    #[instrument(skip(self, description), fields(contract = %self.contract))]
    async fn log_job(&self, job_type: &str, description: &str) -> LedgerResult<TxReceipt> {
        let signer = self.signer.as_ref().ok_or(LedgerError::MissingSigningKey)?;
        let from = signer.address();
        let data = abi::encode_log_job(job_type, description);

        let nonce = self.rpc.transaction_count(from).await?;
        let gas_price = self.rpc.gas_price().await?;
        let estimate = self.rpc.estimate_gas(from, &self.contract, &data).await?;
        let gas_limit = gas_with_headroom(estimate);

        let tx = LegacyTransaction {
            nonce,
            gas_price,
            gas_limit,
            to: self.contract.clone(),
            value: 0,
            data,
            chain_id: self.chain_id,
        };
        let signed = signer.sign(&tx)?;
        let tx_hash = self.rpc.send_raw_transaction(&signed.raw_hex()).await?;
        debug!(%tx_hash, nonce, gas_limit, "Sent logJob transaction");

        let receipt = self.wait_for_receipt(&tx_hash, from).await?;
        info!(tx_hash = %receipt.tx_hash, block = ?receipt.block_number, "Job logged");
        Ok(receipt)
    }

    async fn fetch_jobs(&self) -> LedgerResult<Vec<JobRecord>> {
        let records = match self.query_mode {
            QueryMode::Events => self.fetch_from_events().await?,
            QueryMode::View => self.fetch_from_view().await?,
        };
        debug!(count = records.len(), mode = %self.query_mode, "Fetched job history");
        Ok(records)
    }
}

/// In-process ledger for development and tests.
#[derive(Debug)]
pub struct MemoryLedger {
    submitter: Address,
    records: RwLock<Vec<JobRecord>>,
    sequence: AtomicU64,
    offline: AtomicBool,
}

impl MemoryLedger {
    /// Empty ledger whose writes are attributed to `submitter`.
    pub fn new(submitter: Address) -> Self {
        Self {
            submitter,
            records: RwLock::new(Vec::new()),
            sequence: AtomicU64::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Seed with existing records, given newest first.
    pub fn with_records(submitter: Address, records: Vec<JobRecord>) -> Self {
        let ledger = Self::new(submitter);
        ledger.sequence.store(records.len() as u64, Ordering::Relaxed);
        Self {
            records: RwLock::new(records),
            ..ledger
        }
    }

    /// Make every call fail, to exercise error paths.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn check_online(&self) -> LedgerResult<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(LedgerError::Unavailable("memory ledger is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    fn name(&self) -> &str {
        "memory"
    }

    fn submitter(&self) -> Option<Address> {
        Some(self.submitter.clone())
    }

    async fn log_job(&self, job_type: &str, description: &str) -> LedgerResult<TxReceipt> {
        self.check_online()?;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;

        let mut preimage = seq.to_be_bytes().to_vec();
        preimage.extend_from_slice(job_type.as_bytes());
        preimage.extend_from_slice(description.as_bytes());
        let tx_hash = format!("0x{}", hex::encode(abi::keccak256(&preimage)));

        let record = JobRecord::new(
            self.submitter.clone(),
            job_type,
            JobPayload::parse(description),
            Utc::now(),
            tx_hash.clone(),
        )
        .relayed_by(&self.submitter);
        self.records.write().await.insert(0, record);

        Ok(TxReceipt {
            tx_hash,
            block_number: Some(seq),
            from: self.submitter.clone(),
        })
    }

    async fn fetch_jobs(&self) -> LedgerResult<Vec<JobRecord>> {
        self.check_online()?;
        Ok(self.records.read().await.clone())
    }

    async fn job_count(&self) -> LedgerResult<usize> {
        self.check_online()?;
        Ok(self.records.read().await.len())
    }
}
