//! Gas policy applied before ownership transfers and reclaims.
//!
//! On networks with an id at or below [`TransactionConfig::private_network_max_id`] the node's
//! default estimation is not trusted: the exact call is estimated and submitted with a gas
//! limit of `estimate × gas_multiplier`. Public networks keep the node default.

use serde::{Deserialize, Serialize};

use crate::{
    contracts::ChainContext,
    rpc::RpcError,
    types::{Overrides, TxRequest, B256},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    /// Highest network id treated as a private or test network.
    #[serde(default = "default_private_network_max_id")]
    pub private_network_max_id: u64,
    /// Safety multiplier applied to gas estimates on private networks.
    #[serde(default = "default_gas_multiplier")]
    pub gas_multiplier: u64,
}

fn default_private_network_max_id() -> u64 {
    1000
}

fn default_gas_multiplier() -> u64 {
    2
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            private_network_max_id: default_private_network_max_id(),
            gas_multiplier: default_gas_multiplier(),
        }
    }
}

/// Network-dependent gas policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionPolicy {
    config: TransactionConfig,
}

impl TransactionPolicy {
    #[must_use]
    pub fn new(config: TransactionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn is_private_network(&self, network_id: u64) -> bool {
        network_id <= self.config.private_network_max_id
    }

    /// Gas limit for a given estimate. Saturates instead of overflowing.
    #[must_use]
    pub fn gas_limit(&self, estimate: u64) -> u64 {
        estimate.saturating_mul(self.config.gas_multiplier)
    }

    /// Applies `overrides` and, on private networks, the estimated gas limit.
    ///
    /// The sender defaults to the active account so the estimate matches the submitted call.
    ///
    /// # Errors
    ///
    /// Propagates account, network id and estimation failures.
    pub async fn prepare(
        &self,
        chain: &dyn ChainContext,
        tx: TxRequest,
        overrides: Overrides,
    ) -> Result<TxRequest, RpcError> {
        let mut tx = tx.with_overrides(overrides);
        if tx.from.is_none() {
            tx.from = Some(chain.account().await?);
        }

        let network_id = chain.network_id().await?;
        if self.is_private_network(network_id) {
            let estimate = chain.estimate_gas(&TxRequest { gas: None, ..tx.clone() }).await?;
            let gas = self.gas_limit(estimate);
            tracing::debug!(network_id, estimate, gas, "applying private network gas limit");
            tx.gas = Some(gas);
        }

        Ok(tx)
    }

    /// Prepares and submits `tx`, returning the transaction hash.
    ///
    /// # Errors
    ///
    /// Propagates preparation and submission failures.
    pub async fn submit(
        &self,
        chain: &dyn ChainContext,
        tx: TxRequest,
        overrides: Overrides,
    ) -> Result<B256, RpcError> {
        let tx = self.prepare(chain, tx, overrides).await?;
        chain.send_transaction(tx).await
    }
}
