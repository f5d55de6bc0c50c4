//! EVM JSON-RPC balance reader
//!
//! Reads ERC-20 `balanceOf(owner)` for every query with one batched
//! `eth_call` request per chain. Failures stay per item: a chain that is not
//! configured, unreachable, or answers garbage only fails its own queries.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::http::send_with_retry;
use crate::domain::{is_evm_address, BalanceQuery, BalanceResult, Chain};
use crate::ports::balance::{BalanceError, BalanceSource};

/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: &str = "0x70a08231";

#[derive(Debug, Clone)]
pub struct EvmRpcConfig {
    pub endpoints: HashMap<Chain, String>,
    /// Request timeout
    pub timeout: Duration,
    /// Number of attempts per batch
    pub max_retries: u32,
}

impl Default for EvmRpcConfig {
    fn default() -> Self {
        Self {
            endpoints: HashMap::new(),
            timeout: Duration::from_secs(15),
            max_retries: 3,
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: usize,
    method: &'static str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    id: usize,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Clone)]
pub struct EvmRpcClient {
    config: EvmRpcConfig,
    http: Client,
}

impl EvmRpcClient {
    pub fn new(config: EvmRpcConfig) -> Result<Self, BalanceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BalanceError::RpcError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn endpoint(&self, chain: Chain) -> Option<&str> {
        self.config.endpoints.get(&chain).map(String::as_str)
    }

    /// Send one batch and return raw results keyed by request id
    async fn call_batch(
        &self,
        url: &str,
        batch: &[RpcRequest],
    ) -> Result<HashMap<usize, Result<u128, String>>, BalanceError> {
        let response = send_with_retry(self.config.max_retries, || {
            self.http.post(url).json(batch).send()
        })
        .await
        .map_err(|e| BalanceError::RpcError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BalanceError::RpcError(format!("HTTP {}", status)));
        }

        let responses: Vec<RpcResponse> = response
            .json()
            .await
            .map_err(|e| BalanceError::ParseError(e.to_string()))?;

        Ok(responses
            .into_iter()
            .map(|r| {
                let value = match (r.result, r.error) {
                    (_, Some(err)) => Err(format!("RPC error {}: {}", err.code, err.message)),
                    (Some(hex), None) => parse_hex_u128(&hex),
                    (None, None) => Err("empty response".to_string()),
                };
                (r.id, value)
            })
            .collect())
    }
}

#[async_trait]
impl BalanceSource for EvmRpcClient {
    async fn fetch_balances(
        &self,
        owner: &str,
        queries: &[BalanceQuery],
    ) -> Result<Vec<BalanceResult>, BalanceError> {
        let calldata = encode_balance_of(owner)?;

        let mut results: Vec<BalanceResult> = queries
            .iter()
            .map(|_| BalanceResult::Failure { reason: "no response".to_string() })
            .collect();

        for chain in Chain::ALL {
            let indices: Vec<usize> = queries
                .iter()
                .enumerate()
                .filter(|(_, q)| q.chain == chain)
                .map(|(i, _)| i)
                .collect();
            if indices.is_empty() {
                continue;
            }

            let Some(url) = self.endpoint(chain) else {
                tracing::warn!("No RPC endpoint for {}, skipping {} reads", chain, indices.len());
                for i in indices {
                    results[i] = BalanceResult::Failure {
                        reason: format!("no RPC endpoint for {}", chain),
                    };
                }
                continue;
            };

            let batch: Vec<RpcRequest> = indices
                .iter()
                .map(|&i| balance_of_request(i, &queries[i].token, &calldata))
                .collect();

            match self.call_batch(url, &batch).await {
                Ok(mut by_id) => {
                    for i in indices {
                        results[i] = match by_id.remove(&i) {
                            Some(Ok(raw)) => BalanceResult::Success { raw },
                            Some(Err(reason)) => {
                                tracing::debug!("{} on {}: {}", queries[i].token, chain, reason);
                                BalanceResult::Failure { reason }
                            }
                            None => BalanceResult::Failure { reason: "missing response".to_string() },
                        };
                    }
                }
                Err(e) => {
                    tracing::warn!("Balance batch on {} failed: {}", chain, e);
                    for i in indices {
                        results[i] = BalanceResult::Failure { reason: e.to_string() };
                    }
                }
            }
        }

        Ok(results)
    }
}

fn balance_of_request(id: usize, token: &str, calldata: &str) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        id,
        method: "eth_call",
        params: json!([{ "to": token, "data": calldata }, "latest"]),
    }
}

/// ABI-encode `balanceOf(owner)` calldata
pub fn encode_balance_of(owner: &str) -> Result<String, BalanceError> {
    if !is_evm_address(owner) {
        return Err(BalanceError::InvalidAddress(owner.to_string()));
    }
    Ok(format!("{}{:0>64}", BALANCE_OF_SELECTOR, owner[2..].to_lowercase()))
}

/// Decode a `0x`-prefixed uint256 that must fit in 128 bits
pub fn parse_hex_u128(hex: &str) -> Result<u128, String> {
    let digits = hex
        .strip_prefix("0x")
        .ok_or_else(|| format!("not a hex value: {}", hex))?;
    if digits.is_empty() {
        return Err("empty return data".to_string());
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err("balance exceeds 128 bits".to_string());
    }

    u128::from_str_radix(significant, 16).map_err(|e| format!("bad hex {}: {}", hex, e))
}
