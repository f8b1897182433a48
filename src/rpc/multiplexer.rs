//! Read-call execution with ordered endpoint fallback.
//!
//! # Responsibilities
//! - Execute `eth_call` against a fixed, ordered endpoint list
//! - On any transport or endpoint-reported error, log and fall through to
//!   the next endpoint
//! - Surface `AllEndpointsUnavailable` with the last observed error once
//!   the list is exhausted
//!
//! # Design Decisions
//! - Fallback is strictly sequential, never parallel-raced. Reads are
//!   idempotent so this is only a latency/availability tradeoff, and it
//!   keeps the fallback machinery safe to sit under future call kinds.
//! - No retries within one endpoint; no caching between calls; the order
//!   is static, not adaptive.

use std::time::Duration;

use alloy::primitives::Address;
use serde_json::json;
use url::Url;

use crate::config::schema::LedgerConfig;
use crate::error::{VaultError, VaultResult};

/// Multiplexes read calls over a fixed endpoint list.
#[derive(Debug)]
pub struct RpcMultiplexer {
    endpoints: Vec<Url>,
    client: reqwest::Client,
}

impl RpcMultiplexer {
    /// Build from config. Requires at least one endpoint, and every
    /// endpoint must parse: skipping a bad URL would silently reorder the
    /// fallback list, so a malformed entry is a configuration fault.
    pub fn new(config: &LedgerConfig) -> VaultResult<Self> {
        if config.endpoints.is_empty() {
            return Err(VaultError::NetworkUnavailable(
                "no ledger endpoints configured".to_string(),
            ));
        }
        let mut endpoints = Vec::with_capacity(config.endpoints.len());
        for raw in &config.endpoints {
            let url = raw.parse::<Url>().map_err(|e| {
                VaultError::NetworkUnavailable(format!("invalid endpoint URL '{raw}': {e}"))
            })?;
            endpoints.push(url);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.call_timeout_secs))
            .build()
            .map_err(|e| VaultError::NetworkUnavailable(e.to_string()))?;

        tracing::info!(endpoints = endpoints.len(), "RPC multiplexer initialized");
        Ok(Self { endpoints, client })
    }

    /// Execute one `eth_call`. `caller` is threaded through as the call's
    /// `from` field whenever it is known: several contract reads are gated
    /// by a sender-must-equal-subject check, and omitting the identity
    /// silently turns a valid query into an authorization failure.
    pub async fn call(
        &self,
        call_data_hex: &str,
        contract: Address,
        caller: Option<Address>,
    ) -> VaultResult<String> {
        let mut call_object = json!({
            "to": contract.to_string(),
            "data": call_data_hex,
        });
        if let Some(from) = caller {
            call_object["from"] = json!(from.to_string());
        }
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [call_object, "latest"],
        });

        let mut last = String::from("no endpoints attempted");
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            match self.attempt(endpoint, &body).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(
                        endpoint_idx = index,
                        error = %e,
                        "eth_call failed, trying next endpoint"
                    );
                    last = e.to_string();
                }
            }
        }
        Err(VaultError::AllEndpointsUnavailable { last })
    }

    async fn attempt(&self, endpoint: &Url, body: &serde_json::Value) -> VaultResult<String> {
        let response = self
            .client
            .post(endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| VaultError::NetworkUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VaultError::NetworkUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VaultError::NetworkUnavailable(format!("malformed RPC body: {e}")))?;

        if let Some(err) = payload.get("error") {
            return Err(VaultError::NetworkUnavailable(format!("RPC error: {err}")));
        }
        payload
            .get("result")
            .and_then(|r| r.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                VaultError::NetworkUnavailable("RPC response missing result".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(endpoints: Vec<String>) -> LedgerConfig {
        LedgerConfig {
            endpoints,
            contract_address: "0x1111111111111111111111111111111111111111".to_string(),
            chain_id: 1,
            call_timeout_secs: 1,
            ..LedgerConfig::default()
        }
    }

    #[test]
    fn test_no_valid_endpoints_rejected() {
        assert!(RpcMultiplexer::new(&config_with(vec![])).is_err());
        assert!(RpcMultiplexer::new(&config_with(vec!["::nope::".to_string()])).is_err());
    }

    #[test]
    fn test_any_invalid_endpoint_fails_construction() {
        // A bad URL must not be skipped: that would change the effective
        // fallback order behind the operator's back.
        let err = RpcMultiplexer::new(&config_with(vec![
            "::nope::".to_string(),
            "http://127.0.0.1:18545".to_string(),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("::nope::"));
    }

    #[tokio::test]
    async fn test_all_unreachable_endpoints_carry_last_error() {
        // Unroutable local ports: every attempt fails at transport level,
        // strictly in order, and the terminal error wraps the last one.
        let mux = RpcMultiplexer::new(&config_with(vec![
            "http://127.0.0.1:18545".to_string(),
            "http://127.0.0.1:18546".to_string(),
        ]))
        .unwrap();
        let err = mux
            .call("0xdeadbeef", Address::ZERO, None)
            .await
            .unwrap_err();
        match err {
            VaultError::AllEndpointsUnavailable { last } => {
                assert!(!last.is_empty());
            }
            other => panic!("expected AllEndpointsUnavailable, got {other}"),
        }
    }
}
