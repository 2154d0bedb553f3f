//! JSON-RPC 2.0 wire types.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::{
    types::{Address, TxRequest},
    utils::{format_hex, format_quantity},
};

/// JSON-RPC protocol version constant.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Cow<'static, str>,
    pub method: Cow<'static, str>,
    pub params: serde_json::Value,
    pub id: u64,
}

impl JsonRpcRequest {
    #[must_use]
    pub fn new(method: &'static str, params: serde_json::Value, id: u64) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(JSONRPC_VERSION),
            method: Cow::Borrowed(method),
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 response. Carries either `result` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Transaction object as accepted by `eth_call`, `eth_estimateGas` and `eth_sendTransaction`.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

impl From<&TxRequest> for TransactionObject {
    fn from(tx: &TxRequest) -> Self {
        Self {
            from: tx.from,
            to: tx.to,
            data: format_hex(&tx.data),
            value: tx.value.map(format_quantity),
            gas: tx.gas.map(|g| format_quantity(u128::from(g))),
        }
    }
}

/// The subset of a block header the registrar reads.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockHeader {
    pub number: String,
    pub timestamp: String,
}
