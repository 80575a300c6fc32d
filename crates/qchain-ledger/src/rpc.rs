//! Ethereum JSON-RPC client.
//!
//! [`RpcTransport`] is the seam between request shaping and the wire. The
//! production transport posts JSON-RPC 2.0 envelopes over HTTPS with reqwest;
//! tests substitute a scripted transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use qchain_core::Address;
use reqwest::{Client, header};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::error::{LedgerError, LedgerResult};

/// User-Agent sent with requests.
const USER_AGENT: &str = concat!("qchain/", env!("CARGO_PKG_VERSION"));

/// Sends a single JSON-RPC call and returns its `result`.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> LedgerResult<Value>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP transport.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> LedgerResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": id });
        trace!(%method, id, "rpc request");

        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(LedgerError::Status { status, body });
        }

        let body: RpcResponse = response.json().await?;
        if let Some(err) = body.error {
            return Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(body.result.unwrap_or(Value::Null))
    }
}

/// A raw log entry as returned by `eth_getLogs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// Subset of a transaction receipt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RawReceipt {
    /// `status == 0x1`.
    pub fn succeeded(&self) -> bool {
        self.status
            .as_deref()
            .and_then(|s| parse_quantity(s).ok())
            == Some(1)
    }
}

/// Parse a hex quantity such as `0x1a`.
pub fn parse_quantity(s: &str) -> LedgerResult<u128> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| LedgerError::Decode(format!("quantity without 0x: {s}")))?;
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).map_err(|e| LedgerError::Decode(format!("{s}: {e}")))
}

fn quantity(value: u128) -> String {
    format!("{value:#x}")
}

fn as_str(value: &Value, what: &str) -> LedgerResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LedgerError::Decode(format!("{what}: expected string, got {value}")))
}

fn as_u64(value: &Value, what: &str) -> LedgerResult<u64> {
    let q = parse_quantity(&as_str(value, what)?)?;
    u64::try_from(q).map_err(|_| LedgerError::Decode(format!("{what}: {q} exceeds u64")))
}

/// Typed wrapper over an [`RpcTransport`].
#[derive(Clone)]
pub struct JsonRpcClient {
    transport: Arc<dyn RpcTransport>,
}

impl std::fmt::Debug for JsonRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcClient").finish_non_exhaustive()
    }
}

impl JsonRpcClient {
    /// Client over HTTP.
    pub fn http(url: impl Into<String>) -> LedgerResult<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(url)?)))
    }

    pub fn with_transport(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    pub async fn chain_id(&self) -> LedgerResult<u64> {
        let v = self.transport.request("eth_chainId", json!([])).await?;
        as_u64(&v, "eth_chainId")
    }

    pub async fn block_number(&self) -> LedgerResult<u64> {
        let v = self.transport.request("eth_blockNumber", json!([])).await?;
        as_u64(&v, "eth_blockNumber")
    }

    pub async fn gas_price(&self) -> LedgerResult<u128> {
        let v = self.transport.request("eth_gasPrice", json!([])).await?;
        parse_quantity(&as_str(&v, "eth_gasPrice")?)
    }

    pub async fn balance(&self, address: &Address) -> LedgerResult<u128> {
        let v = self
            .transport
            .request("eth_getBalance", json!([address.as_str(), "latest"]))
            .await?;
        parse_quantity(&as_str(&v, "eth_getBalance")?)
    }

    /// Next nonce including pending transactions.
    pub async fn transaction_count(&self, address: &Address) -> LedgerResult<u64> {
        let v = self
            .transport
            .request(
                "eth_getTransactionCount",
                json!([address.as_str(), "pending"]),
            )
            .await?;
        as_u64(&v, "eth_getTransactionCount")
    }

    pub async fn estimate_gas(
        &self,
        from: &Address,
        to: &Address,
        data: &[u8],
    ) -> LedgerResult<u64> {
        let call = json!({
            "from": from.as_str(),
            "to": to.as_str(),
            "data": format!("0x{}", hex::encode(data)),
        });
        let v = self.transport.request("eth_estimateGas", json!([call])).await?;
        as_u64(&v, "eth_estimateGas")
    }

    /// Read-only call against the latest block; returns the raw return data.
    pub async fn call(&self, to: &Address, data: &[u8]) -> LedgerResult<Vec<u8>> {
        let call = json!({
            "to": to.as_str(),
            "data": format!("0x{}", hex::encode(data)),
        });
        let v = self
            .transport
            .request("eth_call", json!([call, "latest"]))
            .await?;
        crate::abi::decode_hex(&as_str(&v, "eth_call")?)
    }

    pub async fn get_logs(
        &self,
        address: &Address,
        topic0: &str,
        from_block: u64,
        to_block: u64,
    ) -> LedgerResult<Vec<RawLog>> {
        let filter = json!({
            "address": address.as_str(),
            "topics": [topic0],
            "fromBlock": quantity(from_block as u128),
            "toBlock": quantity(to_block as u128),
        });
        debug!(from_block, to_block, "eth_getLogs");
        let v = self.transport.request("eth_getLogs", json!([filter])).await?;
        Ok(serde_json::from_value(v)?)
    }

    /// Broadcast a signed transaction; returns its hash.
    pub async fn send_raw_transaction(&self, raw_hex: &str) -> LedgerResult<String> {
        let v = self
            .transport
            .request("eth_sendRawTransaction", json!([raw_hex]))
            .await?;
        as_str(&v, "eth_sendRawTransaction")
    }

    /// `None` while the transaction is pending.
    pub async fn transaction_receipt(&self, tx_hash: &str) -> LedgerResult<Option<RawReceipt>> {
        let v = self
            .transport
            .request("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        if v.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(v)?))
    }
}
