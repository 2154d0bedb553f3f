use serde::{Deserialize, Serialize};
use std::fmt;

use super::prover::ProverError;
use crate::rpc::RpcError;

/// Proof segment count of a non-existence proof for the queried name.
pub const NAME_NOT_FOUND_SEGMENTS: usize = 4;

/// Proof segment count when the name exists but its `_ens` subdomain does not.
pub const ENS_SUBDOMAIN_MISSING_SEGMENTS: usize = 6;

/// Outcome of a DNS claim verification. Re-derived on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum DnsClaimState {
    /// The prover could not fetch or verify DNS data.
    FetchFailed = 0,
    /// The queried DNS name does not exist.
    NameNotFound = 1,
    /// DNSSEC is not enabled for the domain.
    DnssecDisabled = 2,
    /// The name exists but has no `_ens` subdomain.
    EnsSubdomainMissing = 3,
    /// A record was found but names no readable owner.
    InvalidRecord = 4,
    /// The record's owner matches the on-chain owner, or no on-chain owner was given.
    Valid = 5,
    /// The record's owner differs from the on-chain owner.
    OutOfSync = 6,
}

impl DnsClaimState {
    /// Numeric state code.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DnsClaimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FetchFailed => "fetch_failed",
            Self::NameNotFound => "name_not_found",
            Self::DnssecDisabled => "dnssec_disabled",
            Self::EnsSubdomainMissing => "ens_subdomain_missing",
            Self::InvalidRecord => "invalid_record",
            Self::Valid => "valid",
            Self::OutOfSync => "out_of_sync",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DnsError {
    /// A non-existence proof with a segment count outside the known shapes.
    #[error("DNSSEC results cannot have {segments} segments")]
    ProtocolViolation { segments: usize },

    /// No claim could be prepared for submission.
    #[error("No DNS claim available for {name} (state {state})")]
    ClaimUnavailable { name: String, state: DnsClaimState },

    #[error("Proof retrieval failed: {0}")]
    Prover(#[from] ProverError),

    #[error("Claim submission failed: {0}")]
    Submission(#[source] RpcError),
}

/// Classifies a prover result.
///
/// Owner comparison ignores ASCII case.
///
/// # Errors
///
/// Returns [`DnsError::ProtocolViolation`] for a non-existence proof whose segment count is
/// neither [`NAME_NOT_FOUND_SEGMENTS`] nor [`ENS_SUBDOMAIN_MISSING_SEGMENTS`].
pub fn classify(
    found: bool,
    dns_owner: Option<&str>,
    on_chain_owner: Option<&str>,
    nsec: bool,
    segment_count: usize,
) -> Result<DnsClaimState, DnsError> {
    if found {
        return Ok(match (dns_owner, on_chain_owner) {
            (None, _) => DnsClaimState::InvalidRecord,
            (Some(_), None) => DnsClaimState::Valid,
            (Some(dns), Some(chain)) if dns.eq_ignore_ascii_case(chain) => DnsClaimState::Valid,
            (Some(_), Some(_)) => DnsClaimState::OutOfSync,
        });
    }

    if !nsec {
        return Ok(DnsClaimState::DnssecDisabled);
    }

    match segment_count {
        NAME_NOT_FOUND_SEGMENTS => Ok(DnsClaimState::NameNotFound),
        ENS_SUBDOMAIN_MISSING_SEGMENTS => Ok(DnsClaimState::EnsSubdomainMissing),
        segments => Err(DnsError::ProtocolViolation { segments }),
    }
}
