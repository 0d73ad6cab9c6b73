//! JSON-RPC client for cluster node and account queries.
//!
//! Speaks JSON-RPC 2.0 over HTTP against the configured cluster endpoints:
//! `getClusterNodes` for the version census and `getAccountInfo` with
//! `jsonParsed` encoding for the upgradeable-loader account fields.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SourceError;
use crate::sources::{AccountState, ClusterDataSource, NodeInfo};

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawClusterNode {
    #[serde(default)]
    pubkey: String,
    #[serde(default)]
    version: Option<String>,
}

/// JSON-RPC cluster client with a shared connection-pooled HTTP client.
#[derive(Debug, Clone)]
pub struct RpcClusterClient {
    client: reqwest::Client,
}

impl RpcClusterClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn call(
        &self,
        endpoint: &str,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, SourceError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self.client.post(endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api(format!("{method} returned {status}")));
        }

        let envelope: RpcEnvelope = response.json().await?;
        if let Some(error) = envelope.error {
            return Err(SourceError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| SourceError::Malformed(format!("{method} response has no result")))
    }
}

impl Default for RpcClusterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterDataSource for RpcClusterClient {
    async fn list_nodes(&self, endpoint: &str) -> Result<Vec<NodeInfo>, SourceError> {
        let result = self
            .call(endpoint, "getClusterNodes", serde_json::json!([]))
            .await?;
        parse_nodes(result)
    }

    async fn read_account(
        &self,
        endpoint: &str,
        address: &str,
    ) -> Result<Option<AccountState>, SourceError> {
        let result = self
            .call(
                endpoint,
                "getAccountInfo",
                serde_json::json!([address, { "encoding": "jsonParsed" }]),
            )
            .await?;

        let value = result
            .get("value")
            .ok_or_else(|| SourceError::Malformed("getAccountInfo response has no value".into()))?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(parse_account_state(value)))
    }
}

fn parse_nodes(result: serde_json::Value) -> Result<Vec<NodeInfo>, SourceError> {
    let raw: Vec<RawClusterNode> = serde_json::from_value(result)
        .map_err(|e| SourceError::Malformed(format!("getClusterNodes result: {e}")))?;
    Ok(raw
        .into_iter()
        .map(|node| NodeInfo {
            pubkey: node.pubkey,
            version: node.version,
        })
        .collect())
}

/// Reduce a `jsonParsed` account to the fields the deployment collector
/// reads. Accounts the upstream cannot parse (base64 data, non-loader
/// owners) simply yield both fields `None`; that is a skip, not an error.
fn parse_account_state(value: &serde_json::Value) -> AccountState {
    AccountState {
        program_data: value
            .pointer("/data/parsed/info/programData")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        slot: value.pointer("/data/parsed/info/slot").and_then(|v| v.as_u64()),
    }
}
