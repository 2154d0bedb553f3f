//! Contract bindings over [`RpcClient`] `eth_call`.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use super::{
    calls, ContractConnector, Deed, LegacyRegistrar, NameRegistry, NameResolver,
    PermanentRegistrar, RawLegacyEntry, RegistrarController,
};
use crate::{
    abi::ReturnData,
    rpc::{RpcClient, RpcError},
    types::{Address, InterfaceId, TxRequest, B256},
};

/// A contract address paired with the client used to read it.
#[derive(Clone)]
struct Binding {
    client: Arc<RpcClient>,
    address: Address,
}

impl Binding {
    async fn call(&self, data: Bytes) -> Result<Bytes, RpcError> {
        self.client.eth_call(&TxRequest::new(self.address, data)).await
    }

    async fn call_address(&self, data: Bytes) -> Result<Address, RpcError> {
        let out = self.call(data).await?;
        Ok(ReturnData::new(&out).address(0)?)
    }

    async fn call_b256(&self, data: Bytes) -> Result<B256, RpcError> {
        let out = self.call(data).await?;
        Ok(ReturnData::new(&out).b256(0)?)
    }

    async fn call_bool(&self, data: Bytes) -> Result<bool, RpcError> {
        let out = self.call(data).await?;
        Ok(ReturnData::new(&out).bool(0)?)
    }

    async fn call_u64(&self, data: Bytes) -> Result<u64, RpcError> {
        let out = self.call(data).await?;
        Ok(ReturnData::new(&out).uint64(0)?)
    }

    async fn call_u128(&self, data: Bytes) -> Result<u128, RpcError> {
        let out = self.call(data).await?;
        Ok(ReturnData::new(&out).uint(0)?)
    }
}

/// ENS registry binding.
pub struct EthNameRegistry(Binding);

#[async_trait]
impl NameRegistry for EthNameRegistry {
    async fn resolver(&self, node: B256) -> Result<Address, RpcError> {
        self.0.call_address(calls::resolver(node)).await
    }

    async fn owner(&self, node: B256) -> Result<Address, RpcError> {
        self.0.call_address(calls::owner_of_node(node)).await
    }
}

/// Public resolver binding.
pub struct EthNameResolver(Binding);

#[async_trait]
impl NameResolver for EthNameResolver {
    async fn interface_implementer(
        &self,
        node: B256,
        interface_id: InterfaceId,
    ) -> Result<Address, RpcError> {
        self.0.call_address(calls::interface_implementer(node, interface_id)).await
    }

    async fn addr(&self, node: B256) -> Result<Address, RpcError> {
        self.0.call_address(calls::addr(node)).await
    }
}

/// Legacy auction registrar binding.
pub struct EthLegacyRegistrar(Binding);

#[async_trait]
impl LegacyRegistrar for EthLegacyRegistrar {
    fn address(&self) -> Address {
        self.0.address
    }

    async fn entries(&self, label_hash: B256) -> Result<RawLegacyEntry, RpcError> {
        let out = self.0.call(calls::entries(label_hash)).await?;
        let data = ReturnData::new(&out);
        let state = u8::try_from(data.uint(0)?)
            .map_err(|_| RpcError::InvalidResponse("auction state out of range".to_string()))?;
        Ok(RawLegacyEntry {
            state,
            deed: data.address(1)?,
            registration_date: data.uint64(2)?,
            value: data.uint(3)?,
            highest_bid: data.uint(4)?,
        })
    }
}

/// Deed binding.
pub struct EthDeed(Binding);

#[async_trait]
impl Deed for EthDeed {
    async fn owner(&self) -> Result<Address, RpcError> {
        self.0.call_address(calls::deed_owner()).await
    }
}

/// Permanent (ERC-721) registrar binding.
pub struct EthPermanentRegistrar(Binding);

#[async_trait]
impl PermanentRegistrar for EthPermanentRegistrar {
    fn address(&self) -> Address {
        self.0.address
    }

    async fn available(&self, label_hash: B256) -> Result<bool, RpcError> {
        self.0.call_bool(calls::available_by_id(label_hash)).await
    }

    async fn name_expires(&self, label_hash: B256) -> Result<u64, RpcError> {
        self.0.call_u64(calls::name_expires(label_hash)).await
    }

    async fn owner_of(&self, label_hash: B256) -> Result<Address, RpcError> {
        self.0.call_address(calls::owner_of(label_hash)).await
    }

    async fn grace_period(&self) -> Result<u64, RpcError> {
        self.0.call_u64(calls::grace_period()).await
    }
}

/// Registration controller binding.
pub struct EthRegistrarController(Binding);

#[async_trait]
impl RegistrarController for EthRegistrarController {
    fn address(&self) -> Address {
        self.0.address
    }

    async fn available(&self, label: &str) -> Result<bool, RpcError> {
        self.0.call_bool(calls::available_by_label(label)).await
    }

    async fn rent_price(&self, label: &str, duration: u64) -> Result<u128, RpcError> {
        self.0.call_u128(calls::rent_price(label, duration)).await
    }

    async fn min_commitment_age(&self) -> Result<u64, RpcError> {
        self.0.call_u64(calls::min_commitment_age()).await
    }

    async fn max_commitment_age(&self) -> Result<u64, RpcError> {
        self.0.call_u64(calls::max_commitment_age()).await
    }

    async fn commitments(&self, commitment: B256) -> Result<u64, RpcError> {
        self.0.call_u64(calls::commitments(commitment)).await
    }

    async fn make_commitment(
        &self,
        label: &str,
        owner: Address,
        secret: B256,
    ) -> Result<B256, RpcError> {
        self.0.call_b256(calls::make_commitment(label, owner, secret)).await
    }

    async fn make_commitment_with_config(
        &self,
        label: &str,
        owner: Address,
        secret: B256,
        resolver: Address,
        addr: Address,
    ) -> Result<B256, RpcError> {
        self.0
            .call_b256(calls::make_commitment_with_config(label, owner, secret, resolver, addr))
            .await
    }
}

/// [`ContractConnector`] that reads every contract through one [`RpcClient`].
pub struct EthConnector {
    client: Arc<RpcClient>,
    registry: Address,
}

impl EthConnector {
    #[must_use]
    pub fn new(client: Arc<RpcClient>, registry: Address) -> Self {
        Self { client, registry }
    }

    fn bind(&self, address: Address) -> Binding {
        Binding { client: Arc::clone(&self.client), address }
    }
}

impl ContractConnector for EthConnector {
    fn name_registry(&self) -> Arc<dyn NameRegistry> {
        Arc::new(EthNameRegistry(self.bind(self.registry)))
    }

    fn resolver(&self, address: Address) -> Arc<dyn NameResolver> {
        Arc::new(EthNameResolver(self.bind(address)))
    }

    fn legacy_registrar(&self, address: Address) -> Arc<dyn LegacyRegistrar> {
        Arc::new(EthLegacyRegistrar(self.bind(address)))
    }

    fn deed(&self, address: Address) -> Arc<dyn Deed> {
        Arc::new(EthDeed(self.bind(address)))
    }

    fn permanent_registrar(&self, address: Address) -> Arc<dyn PermanentRegistrar> {
        Arc::new(EthPermanentRegistrar(self.bind(address)))
    }

    fn controller(&self, address: Address) -> Arc<dyn RegistrarController> {
        Arc::new(EthRegistrarController(self.bind(address)))
    }
}
