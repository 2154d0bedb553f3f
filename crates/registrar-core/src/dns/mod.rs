//! DNSSEC-backed claims for names under DNS-enabled tlds.
//!
//! The prover is external. This module classifies its output into a [`DnsClaimState`] and
//! submits proofs to the DNS registrar.
//!
//! | code | state | condition |
//! |------|-------|-----------|
//! | 0 | [`DnsClaimState::FetchFailed`] | prover error |
//! | 1 | [`DnsClaimState::NameNotFound`] | not found, NSEC proof of 4 segments |
//! | 2 | [`DnsClaimState::DnssecDisabled`] | not found, no NSEC proof |
//! | 3 | [`DnsClaimState::EnsSubdomainMissing`] | not found, NSEC proof of 6 segments |
//! | 4 | [`DnsClaimState::InvalidRecord`] | found, no owner |
//! | 5 | [`DnsClaimState::Valid`] | found, owner matches or no on-chain owner |
//! | 6 | [`DnsClaimState::OutOfSync`] | found, owner differs |

pub mod prover;
pub mod state;
pub mod verifier;

pub use prover::{encode_dns_name, DnsProver, DnsQueryResult, ProofBundle, ProverClaim, ProverError};
pub use state::{classify, DnsClaimState, DnsError};
pub use verifier::{is_dns_tld, DnsClaim, DnsClaimVerifier};
