//! Contract collaborators consumed by the registrar.
//!
//! Reads are modeled as traits so the reconciliation logic can run against the JSON-RPC
//! backend in [`eth`] or against in-memory fakes in tests. Writes are plain calldata built by
//! [`calls`] and submitted through [`ChainContext::send_transaction`], which keeps every
//! mutation on one path where the transaction policy applies.
//!
//! # Surfaces
//!
//! | Trait | Contract |
//! |-------|----------|
//! | [`NameRegistry`] | ENS registry (`resolver`, `owner`) |
//! | [`NameResolver`] | public resolver (`interfaceImplementer`, `addr`) |
//! | [`LegacyRegistrar`] | auction-era `HashRegistrar` (`entries`) |
//! | [`Deed`] | escrow deed (`owner`) |
//! | [`PermanentRegistrar`] | `BaseRegistrarImplementation` |
//! | [`RegistrarController`] | `ETHRegistrarController` |
//! | [`ChainContext`] | block time, active account, network id, gas, submission |

pub mod calls;
pub mod eth;

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    rpc::RpcError,
    types::{Address, InterfaceId, TxRequest, B256},
};

/// Raw `entries(bytes32)` tuple from the legacy auction registrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawLegacyEntry {
    pub state: u8,
    pub deed: Address,
    /// Unix seconds.
    pub registration_date: u64,
    pub value: u128,
    pub highest_bid: u128,
}

#[async_trait]
pub trait NameRegistry: Send + Sync {
    async fn resolver(&self, node: B256) -> Result<Address, RpcError>;

    async fn owner(&self, node: B256) -> Result<Address, RpcError>;
}

#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn interface_implementer(
        &self,
        node: B256,
        interface_id: InterfaceId,
    ) -> Result<Address, RpcError>;

    async fn addr(&self, node: B256) -> Result<Address, RpcError>;
}

#[async_trait]
pub trait LegacyRegistrar: Send + Sync {
    fn address(&self) -> Address;

    async fn entries(&self, label_hash: B256) -> Result<RawLegacyEntry, RpcError>;
}

#[async_trait]
pub trait Deed: Send + Sync {
    async fn owner(&self) -> Result<Address, RpcError>;
}

#[async_trait]
pub trait PermanentRegistrar: Send + Sync {
    fn address(&self) -> Address;

    async fn available(&self, label_hash: B256) -> Result<bool, RpcError>;

    /// Expiry in unix seconds; 0 if never registered.
    async fn name_expires(&self, label_hash: B256) -> Result<u64, RpcError>;

    /// Reverts for tokens that were never minted.
    async fn owner_of(&self, label_hash: B256) -> Result<Address, RpcError>;

    /// Grace period in seconds.
    async fn grace_period(&self) -> Result<u64, RpcError>;
}

#[async_trait]
pub trait RegistrarController: Send + Sync {
    fn address(&self) -> Address;

    /// Availability including the controller's label validity rules.
    async fn available(&self, label: &str) -> Result<bool, RpcError>;

    /// Price in wei for `duration` seconds.
    async fn rent_price(&self, label: &str, duration: u64) -> Result<u128, RpcError>;

    async fn min_commitment_age(&self) -> Result<u64, RpcError>;

    async fn max_commitment_age(&self) -> Result<u64, RpcError>;

    /// Timestamp at which `commitment` was committed; 0 if never.
    async fn commitments(&self, commitment: B256) -> Result<u64, RpcError>;

    async fn make_commitment(
        &self,
        label: &str,
        owner: Address,
        secret: B256,
    ) -> Result<B256, RpcError>;

    async fn make_commitment_with_config(
        &self,
        label: &str,
        owner: Address,
        secret: B256,
        resolver: Address,
        addr: Address,
    ) -> Result<B256, RpcError>;
}

/// Chain-level context: time, identity, and transaction submission.
#[async_trait]
pub trait ChainContext: Send + Sync {
    /// Timestamp of the latest block in unix seconds.
    async fn block_timestamp(&self) -> Result<u64, RpcError>;

    /// The account that signs and pays for submitted transactions.
    async fn account(&self) -> Result<Address, RpcError>;

    async fn network_id(&self) -> Result<u64, RpcError>;

    async fn estimate_gas(&self, tx: &TxRequest) -> Result<u64, RpcError>;

    /// Submits a transaction and returns its hash. Confirmation is not tracked.
    async fn send_transaction(&self, tx: TxRequest) -> Result<B256, RpcError>;
}

/// Binds contract collaborators at addresses.
pub trait ContractConnector: Send + Sync {
    fn name_registry(&self) -> Arc<dyn NameRegistry>;

    fn resolver(&self, address: Address) -> Arc<dyn NameResolver>;

    fn legacy_registrar(&self, address: Address) -> Arc<dyn LegacyRegistrar>;

    fn deed(&self, address: Address) -> Arc<dyn Deed>;

    fn permanent_registrar(&self, address: Address) -> Arc<dyn PermanentRegistrar>;

    fn controller(&self, address: Address) -> Arc<dyn RegistrarController>;
}
