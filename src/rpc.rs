//! JSON-RPC wallet transport over HTTP.
//!
//! Implements [`WalletProvider`] against any EIP-1193-style endpoint
//! (a node, or a wallet bridge exposing the same methods). Contract
//! bindings plug in separately through [`crate::provider::VotingContract`];
//! this module only covers the identity side of the boundary.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::provider::{RpcError, WalletProvider};
use crate::types::{Address, Amount};

// EIP-1193: the user rejected the request.
const USER_REJECTED: i64 = 4001;

pub struct HttpProvider {
    client: Client,
    url: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RpcError::Unreachable(e.to_string())
                } else {
                    RpcError::Transport(e.to_string())
                }
            })?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(if error.code == USER_REJECTED {
                RpcError::Rejected(error.message)
            } else {
                RpcError::Transport(error.message)
            });
        }
        parsed
            .result
            .ok_or_else(|| RpcError::Transport("empty rpc result".into()))
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        let result = self.call("eth_requestAccounts", json!([])).await?;
        let accounts: Vec<String> =
            serde_json::from_value(result).map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(accounts.into_iter().map(Address::new).collect())
    }

    async fn get_balance(&self, account: &Address) -> Result<Amount, RpcError> {
        let result = self
            .call("eth_getBalance", json!([account.as_str(), "latest"]))
            .await?;
        let quantity: String =
            serde_json::from_value(result).map_err(|e| RpcError::Transport(e.to_string()))?;
        let raw = u128::from_str_radix(quantity.trim_start_matches("0x"), 16)
            .map_err(|e| RpcError::Transport(format!("bad balance quantity {quantity:?}: {e}")))?;
        Ok(Amount::from_base_units(raw))
    }
}
