//! Block explorer statistics.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// Client for the explorer's `/api/v2/stats` endpoint.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    client: Client,
    stats_url: String,
}

impl ExplorerClient {
    pub fn new(stats_url: impl Into<String>) -> LedgerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            stats_url: stats_url.into(),
        })
    }

    /// Current transactions per second reported by the explorer.
    pub async fn tps(&self) -> LedgerResult<f64> {
        let response = self.client.get(&self.stats_url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(LedgerError::Status { status, body });
        }
        let stats: Value = response.json().await?;
        let tps = extract_tps(&stats)?;
        debug!(tps, "Explorer stats");
        Ok(tps)
    }
}

/// The explorer reports `tps` as a number or a numeric string.
fn extract_tps(stats: &Value) -> LedgerResult<f64> {
    match stats.get("tps") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| LedgerError::Decode(format!("tps out of range: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| LedgerError::Decode(format!("tps is not numeric: {s}"))),
        _ => Err(LedgerError::Decode("stats response has no tps".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extract_tps() {
        assert_eq!(extract_tps(&json!({"tps": 12.5})).unwrap(), 12.5);
        assert_eq!(extract_tps(&json!({"tps": "1834.2"})).unwrap(), 1834.2);
        assert!(extract_tps(&json!({"tps": "fast"})).is_err());
        assert!(extract_tps(&json!({"blocks": 1})).is_err());
    }
}
