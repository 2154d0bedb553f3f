use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{rpc::RpcError, types::B256};

/// Revert message fragments that indicate the attached payment was below the rent price.
const UNDERPRICED_MARKERS: &[&str] = &["insufficient value", "underpaid", "not enough value"];

/// Failure of a registry-mutating operation. Always propagated to the caller.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RegistrationError {
    /// The contract needed for this operation could not be resolved for the tld.
    #[error("{contract} unavailable for tld {tld}")]
    RegistryUnavailable { tld: String, contract: &'static str },

    /// The commitment was never submitted, or was already consumed.
    #[error("Commitment {commitment} not found")]
    CommitmentNotFound { commitment: B256 },

    /// The minimum commitment age has not elapsed.
    #[error("Commitment too new, can be revealed from {ready_at}")]
    CommitmentTooNew { ready_at: DateTime<Utc> },

    /// The maximum commitment age has elapsed.
    #[error("Commitment expired at {expired_at}")]
    CommitmentExpired { expired_at: DateTime<Utc> },

    /// The node rejected the call because the payment was below the price.
    #[error("Payment below rent price: {0}")]
    Underpriced(String),

    #[error("Label {label} is not available")]
    Unavailable { label: String },

    /// Transport, signing or any other node-side failure.
    #[error("Transport error: {0}")]
    Transport(RpcError),
}

impl From<RpcError> for RegistrationError {
    fn from(e: RpcError) -> Self {
        if let RpcError::JsonRpc(_, message) = &e {
            let lower = message.to_lowercase();
            if e.is_execution_error() && UNDERPRICED_MARKERS.iter().any(|m| lower.contains(m)) {
                return Self::Underpriced(message.clone());
            }
        }
        Self::Transport(e)
    }
}
