use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use super::{
    errors::RpcError,
    http_client::{HttpClient, HttpClientConfig},
    types::{BlockHeader, JsonRpcRequest, JsonRpcResponse, TransactionObject},
};
use crate::{
    types::{Address, TxRequest, B256},
    utils::{format_hex, parse_hex_bytes, parse_hex_u64},
};

/// JSON-RPC client bound to a single node URL.
///
/// Request ids are allocated from a per-client counter.
pub struct RpcClient {
    url: String,
    http: HttpClient,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Creates a client for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        http_config: HttpClientConfig,
    ) -> Result<Self, RpcError> {
        Ok(Self {
            url: url.into(),
            http: HttpClient::with_config(http_config)?,
            timeout,
            next_id: AtomicU64::new(1),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends a JSON-RPC request and deserializes its `result`.
    ///
    /// A missing `result` is handed to the deserializer as `null`, so `Option<T>` targets
    /// observe `None`.
    ///
    /// # Errors
    ///
    /// - [`RpcError::JsonRpc`] if the node returns an error object
    /// - [`RpcError::InvalidResponse`] if the body or result does not parse
    /// - transport errors from [`HttpClient::send_request`]
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(method, params, id);

        let body = serde_json::to_vec(&request)
            .map_err(|e| RpcError::InvalidRequest(format!("Failed to serialize request: {e}")))?;

        tracing::trace!(method, id, "sending rpc request");

        let response_bytes =
            self.http.send_request(&self.url, Bytes::from(body), self.timeout).await?;

        let response: JsonRpcResponse = serde_json::from_slice(&response_bytes)
            .map_err(|e| RpcError::InvalidResponse(format!("Invalid JSON: {e}")))?;

        if let Some(error) = response.error {
            tracing::debug!(
                method,
                code = error.code,
                message = %error.message,
                "rpc error response"
            );
            return Err(RpcError::JsonRpc(error.code, error.message));
        }

        serde_json::from_value(response.result.unwrap_or(Value::Null)).map_err(|e| {
            RpcError::InvalidResponse(format!("Unexpected result for {method}: {e}"))
        })
    }

    /// Executes a read-only call against the latest block and returns the raw return data.
    ///
    /// # Errors
    ///
    /// Reverts surface as [`RpcError::JsonRpc`] with an execution error category.
    pub async fn eth_call(&self, tx: &TxRequest) -> Result<Bytes, RpcError> {
        let params = json!([TransactionObject::from(tx), "latest"]);
        let hex: String = self.request("eth_call", params).await?;
        parse_hex_bytes(&hex)
            .map(Bytes::from)
            .ok_or_else(|| RpcError::InvalidResponse(format!("eth_call returned non-hex: {hex}")))
    }

    /// Fetches the latest block header.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::InvalidResponse`] if the node has no latest block.
    pub async fn latest_block(&self) -> Result<BlockHeader, RpcError> {
        let block: Option<BlockHeader> =
            self.request("eth_getBlockByNumber", json!(["latest", false])).await?;
        block.ok_or_else(|| RpcError::InvalidResponse("latest block not found".to_string()))
    }

    /// Timestamp of the latest block in unix seconds.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::latest_block`] failures.
    pub async fn block_timestamp(&self) -> Result<u64, RpcError> {
        let block = self.latest_block().await?;
        parse_hex_u64(&block.timestamp).ok_or_else(|| {
            RpcError::InvalidResponse(format!("invalid block timestamp: {}", block.timestamp))
        })
    }

    /// Network id as reported by `net_version`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::InvalidResponse`] if the id is not a decimal integer.
    pub async fn net_version(&self) -> Result<u64, RpcError> {
        let version: String = self.request("net_version", json!([])).await?;
        version
            .parse()
            .map_err(|_| RpcError::InvalidResponse(format!("invalid net_version: {version}")))
    }

    /// Accounts managed by the node.
    ///
    /// # Errors
    ///
    /// Propagates transport and decoding errors.
    pub async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.request("eth_accounts", json!([])).await
    }

    /// Estimates gas for `tx`.
    ///
    /// # Errors
    ///
    /// Reverting calls surface as [`RpcError::JsonRpc`].
    pub async fn estimate_gas(&self, tx: &TxRequest) -> Result<u64, RpcError> {
        let quantity: String =
            self.request("eth_estimateGas", json!([TransactionObject::from(tx)])).await?;
        parse_hex_u64(&quantity)
            .ok_or_else(|| RpcError::InvalidResponse(format!("invalid gas estimate: {quantity}")))
    }

    /// Submits `tx` for signing by the node and returns the transaction hash.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and node rejections.
    pub async fn send_transaction(&self, tx: &TxRequest) -> Result<B256, RpcError> {
        let hash: B256 =
            self.request("eth_sendTransaction", json!([TransactionObject::from(tx)])).await?;
        tracing::debug!(
            to = %tx.to,
            selector = %format_hex(&tx.data[..tx.data.len().min(4)]),
            tx_hash = %hash,
            "transaction submitted"
        );
        Ok(hash)
    }
}
