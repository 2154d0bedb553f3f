use std::sync::Arc;

use super::{
    prover::{DnsProver, ProverClaim},
    state::{classify, DnsClaimState, DnsError},
};
use crate::{
    contracts::{calls, ChainContext},
    types::{Address, B256},
};

/// Result of a DNS claim verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsClaim {
    pub state: DnsClaimState,
    /// Owner named by the DNS record, present only when a record was found.
    pub dns_owner: Option<String>,
    /// The prover's claim, retained for submission. `None` when the fetch failed.
    pub claim: Option<ProverClaim>,
}

impl DnsClaim {
    /// DNS wire-format name carried by the claim.
    #[must_use]
    pub fn encoded_name(&self) -> Option<&[u8]> {
        self.claim.as_ref().map(|c| c.encoded_name.as_ref())
    }
}

/// Returns `true` if `tld` is one of `dns_tlds`, ignoring ASCII case.
#[must_use]
pub fn is_dns_tld(dns_tlds: &[String], tld: &str) -> bool {
    dns_tlds.iter().any(|t| t.eq_ignore_ascii_case(tld))
}

/// Verifies and submits DNSSEC-backed claims for names under DNS-enabled tlds.
pub struct DnsClaimVerifier {
    prover: Arc<dyn DnsProver>,
    chain: Arc<dyn ChainContext>,
    dns_tlds: Arc<[String]>,
}

impl DnsClaimVerifier {
    #[must_use]
    pub fn new(
        prover: Arc<dyn DnsProver>,
        chain: Arc<dyn ChainContext>,
        dns_tlds: Arc<[String]>,
    ) -> Self {
        Self { prover, chain, dns_tlds }
    }

    /// Returns `true` if `tld` is served by the DNS registrar.
    #[must_use]
    pub fn is_dns_registrar(&self, tld: &str) -> bool {
        is_dns_tld(&self.dns_tlds, tld)
    }

    /// Verifies the DNS claim for `name` against the DNS registrar at `parent_owner`.
    ///
    /// Prover failures yield [`DnsClaimState::FetchFailed`]. Nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::ProtocolViolation`] if the non-existence proof has an unknown shape.
    pub async fn get_dns_entry(
        &self,
        name: &str,
        parent_owner: Address,
        owner: Option<Address>,
    ) -> Result<DnsClaim, DnsError> {
        let claim = match self.prover.claim(name, parent_owner).await {
            Ok(claim) => claim,
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "problem fetching data from DNS");
                let state = DnsClaimState::FetchFailed;
                return Ok(DnsClaim { state, dns_owner: None, claim: None });
            }
        };

        let result = &claim.result;
        let dns_owner = if result.found { claim.owner.clone() } else { None };
        let on_chain_owner = owner.map(|o| o.to_string());

        let state = classify(
            result.found,
            dns_owner.as_deref(),
            on_chain_owner.as_deref(),
            result.nsec,
            result.results.len(),
        )
        .inspect_err(|e| tracing::error!(name = %name, error = %e, "invalid DNSSEC proof shape"))?;

        tracing::debug!(name = %name, state = %state, "dns claim classified");

        Ok(DnsClaim { state, dns_owner, claim: Some(claim) })
    }

    /// Submits the claim for `name` to the DNS registrar at `parent_owner`.
    ///
    /// Uses `claim` when the oracle already holds every proof, otherwise `proveAndClaim`.
    ///
    /// # Errors
    ///
    /// - [`DnsError::ClaimUnavailable`] if the prover produced no claim
    /// - [`DnsError::Prover`] if proofs cannot be collected
    /// - [`DnsError::Submission`] if the transaction is rejected
    pub async fn submit_proof(&self, name: &str, parent_owner: Address) -> Result<B256, DnsError> {
        let entry = self.get_dns_entry(name, parent_owner, None).await?;
        let Some(claim) = entry.claim else {
            return Err(DnsError::ClaimUnavailable { name: name.to_string(), state: entry.state });
        };

        let (proofs, all_proven) =
            tokio::try_join!(self.prover.all_proofs(&claim), self.prover.all_proven(&claim))?;

        let tx = if all_proven {
            calls::dns_claim(parent_owner, &claim.encoded_name, &proofs.proof_data)
        } else {
            calls::dns_prove_and_claim(
                parent_owner,
                &claim.encoded_name,
                &proofs.proof,
                &proofs.proof_data,
            )
        };

        tracing::info!(name = %name, all_proven, "submitting dns claim");
        self.chain.send_transaction(tx).await.map_err(DnsError::Submission)
    }
}
