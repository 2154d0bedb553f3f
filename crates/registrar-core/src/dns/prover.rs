//! Boundary to the external DNSSEC prover.

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};

use crate::{rpc::RpcError, types::Address};

/// Maximum length of a single DNS label in wire format.
const MAX_DNS_LABEL_LEN: usize = 63;

/// DNSSEC query outcome for the `_ens` TXT record of a name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsQueryResult {
    /// The record was found and verified.
    pub found: bool,
    /// A non-existence proof was returned.
    pub nsec: bool,
    /// Signed record sets making up the proof chain.
    pub results: Vec<Bytes>,
}

/// A claim prepared by the prover for one name against one DNS registrar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProverClaim {
    pub name: String,
    /// Name in DNS wire format, as passed to the registrar.
    pub encoded_name: Bytes,
    /// Owner address from the `_ens` TXT record; `None` if the record did not parse.
    pub owner: Option<String>,
    pub result: DnsQueryResult,
}

/// Proof material accepted by the DNS registrar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProofBundle {
    pub proof: Bytes,
    pub proof_data: Bytes,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProverError {
    #[error("DNS query failed: {0}")]
    Query(String),

    #[error("Oracle read failed: {0}")]
    Oracle(#[from] RpcError),
}

/// Produces DNSSEC claims and the proofs needed to submit them.
#[async_trait]
pub trait DnsProver: Send + Sync {
    /// Queries DNS for `name` and prepares a claim against the DNS registrar at `registrar`.
    async fn claim(&self, name: &str, registrar: Address) -> Result<ProverClaim, ProverError>;

    /// Collects the proofs the oracle does not hold yet, plus the final record data.
    async fn all_proofs(&self, claim: &ProverClaim) -> Result<ProofBundle, ProverError>;

    /// Returns `true` if the oracle already holds every proof in the chain.
    async fn all_proven(&self, claim: &ProverClaim) -> Result<bool, ProverError>;
}

/// Encodes a dotted name in DNS wire format. Returns `None` for empty or oversized labels.
///
/// ```
/// use registrar_core::dns::encode_dns_name;
///
/// assert_eq!(encode_dns_name("ab.xyz").unwrap().as_ref(), b"\x02ab\x03xyz\x00");
/// ```
#[must_use]
pub fn encode_dns_name(name: &str) -> Option<Bytes> {
    let name = name.strip_suffix('.').unwrap_or(name);
    let mut out = BytesMut::with_capacity(name.len() + 2);
    if !name.is_empty() {
        for label in name.split('.') {
            if label.is_empty() || label.len() > MAX_DNS_LABEL_LEN {
                return None;
            }
            // Bounded by MAX_DNS_LABEL_LEN.
            #[allow(clippy::cast_possible_truncation)]
            out.put_u8(label.len() as u8);
            out.put_slice(label.as_bytes());
        }
    }
    out.put_u8(0);
    Some(out.freeze())
}
