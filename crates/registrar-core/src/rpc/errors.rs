use thiserror::Error;

use crate::abi::AbiError;

/// Classification of JSON-RPC errors returned by the node.
///
/// - Client errors mean the request itself was wrong
/// - Provider errors and rate limits are the node's problem and may clear on retry
/// - Execution errors are contract reverts and never clear on retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcErrorCategory {
    /// Invalid request, method not found, invalid params.
    ClientError,
    /// Internal error or unclassified server error.
    ProviderError,
    /// Rate limiting at JSON-RPC level (-32005).
    RateLimit,
    /// Malformed JSON from the node.
    ParseError,
    /// Reverts, out of gas, insufficient funds.
    ExecutionError,
}

impl RpcErrorCategory {
    /// Classifies a JSON-RPC error code and message into a category.
    ///
    /// Standard JSON-RPC error codes:
    /// - -32700: Parse error
    /// - -32600: Invalid Request
    /// - -32601: Method not found
    /// - -32602: Invalid params
    /// - -32603: Internal error
    /// - -32000 to -32099: Server errors (classified by message content)
    /// - -32005: Limit exceeded
    /// - 3: Geth's code for `execution reverted` with revert data
    #[must_use]
    pub fn from_code_and_message(code: i32, message: &str) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32602..=-32600 => Self::ClientError,
            -32603 => Self::ProviderError,
            -32005 => Self::RateLimit,
            3 => Self::ExecutionError,
            -32099..=-32000 => {
                let message_lower = message.to_lowercase();
                if message_lower.contains("execution reverted") ||
                    message_lower.contains("revert") ||
                    message_lower.contains("out of gas") ||
                    message_lower.contains("insufficient funds") ||
                    message_lower.contains("nonce too low") ||
                    message_lower.contains("gas too low")
                {
                    Self::ExecutionError
                } else {
                    Self::ProviderError
                }
            }
            _ => Self::ProviderError,
        }
    }

    /// Returns `true` if the error may clear on retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimit | Self::ProviderError)
    }

    /// Returns a static string representation for log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientError => "client_error",
            Self::ProviderError => "provider_error",
            Self::RateLimit => "rate_limit",
            Self::ParseError => "parse_error",
            Self::ExecutionError => "execution_error",
        }
    }
}

/// Errors that can occur when talking to the node.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RpcError {
    /// Request exceeded the configured timeout duration.
    #[error("Request timeout")]
    Timeout,

    /// Failed to establish a connection to the node.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Non-2xx HTTP status. First field is the status code.
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// JSON-RPC error object returned by the node. First field is the RPC error code.
    #[error("RPC error {0}: {1}")]
    JsonRpc(i32, String),

    /// Network-level error from the underlying HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response could not be parsed or was malformed.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be built or serialized.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Maximum concurrent requests limit has been reached.
    #[error("Concurrency limit reached: {0}")]
    ConcurrencyLimit(String),

    /// Contract return data did not decode.
    #[error("ABI decode error: {0}")]
    Abi(#[from] AbiError),

    /// The node exposes no account to act as sender.
    #[error("No active account available")]
    NoAccount,
}

impl RpcError {
    /// Returns the RPC error category if this is a JSON-RPC error.
    #[must_use]
    pub fn rpc_category(&self) -> Option<RpcErrorCategory> {
        match self {
            Self::JsonRpc(code, message) => {
                Some(RpcErrorCategory::from_code_and_message(*code, message))
            }
            _ => None,
        }
    }

    /// Returns `true` if the node reported a contract revert or execution failure.
    #[must_use]
    pub fn is_execution_error(&self) -> bool {
        self.rpc_category() == Some(RpcErrorCategory::ExecutionError)
    }

    /// Returns `true` if this error is transient and the request may be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) | Self::ConnectionFailed(_) => true,
            Self::HttpError(status, _) => (500..=599).contains(status) || *status == 429,
            Self::JsonRpc(_, _) => self.rpc_category().is_some_and(|cat| cat.is_transient()),
            _ => false,
        }
    }
}
