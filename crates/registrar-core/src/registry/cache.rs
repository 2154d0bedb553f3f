use dashmap::DashMap;
use std::{fmt, future::Future, sync::Arc};
use tokio::sync::OnceCell;

use crate::{
    contracts::{
        ContractConnector, LegacyRegistrar, NameRegistry, PermanentRegistrar, RegistrarController,
    },
    namehash::namehash,
    rpc::RpcError,
    types::{Address, InterfaceId},
};

/// Interface ids published on a tld's resolver that point at its registrars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrarInterfaces {
    pub legacy_registrar: InterfaceId,
    pub permanent_registrar: InterfaceId,
}

impl Default for RegistrarInterfaces {
    fn default() -> Self {
        Self {
            legacy_registrar: InterfaceId([0x7b, 0xa1, 0x8b, 0xa1]),
            permanent_registrar: InterfaceId([0x01, 0x8f, 0xac, 0x06]),
        }
    }
}

/// Registrar contract handles for one tld. An absent handle means the feature is unavailable
/// for that tld.
#[derive(Clone, Default)]
pub struct RegistryHandles {
    pub legacy_registrar: Option<Arc<dyn LegacyRegistrar>>,
    pub permanent_registrar: Option<Arc<dyn PermanentRegistrar>>,
    pub controller: Option<Arc<dyn RegistrarController>>,
}

impl fmt::Debug for RegistryHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryHandles")
            .field("legacy_registrar", &self.legacy_registrar.as_ref().map(|h| h.address()))
            .field("permanent_registrar", &self.permanent_registrar.as_ref().map(|h| h.address()))
            .field("controller", &self.controller.as_ref().map(|h| h.address()))
            .finish()
    }
}

/// Lazily filled slots for one tld. An empty slot is retried on next access.
#[derive(Default)]
struct TldSlots {
    legacy_registrar: OnceCell<Arc<dyn LegacyRegistrar>>,
    permanent_registrar: OnceCell<Arc<dyn PermanentRegistrar>>,
    controller: OnceCell<Arc<dyn RegistrarController>>,
    grace_period: OnceCell<u64>,
    min_commitment_age: OnceCell<u64>,
    max_commitment_age: OnceCell<u64>,
}

/// Process-wide cache of registrar handles and near-constant registrar values, keyed by tld.
///
/// Each handle is resolved at most once per tld. Concurrent first callers wait on the same
/// resolution; a failed resolution stores nothing so the next caller tries again. Once a slot is
/// filled every caller receives a clone of the same `Arc`.
pub struct RegistryCache {
    connector: Arc<dyn ContractConnector>,
    registry: Arc<dyn NameRegistry>,
    interfaces: RegistrarInterfaces,
    tlds: DashMap<String, Arc<TldSlots>>,
}

impl RegistryCache {
    #[must_use]
    pub fn new(connector: Arc<dyn ContractConnector>, interfaces: RegistrarInterfaces) -> Self {
        let registry = connector.name_registry();
        Self { connector, registry, interfaces, tlds: DashMap::new() }
    }

    #[must_use]
    pub fn connector(&self) -> &Arc<dyn ContractConnector> {
        &self.connector
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<dyn NameRegistry> {
        &self.registry
    }

    fn slots(&self, tld: &str) -> Arc<TldSlots> {
        if let Some(slots) = self.tlds.get(tld) {
            return Arc::clone(&slots);
        }
        Arc::clone(&self.tlds.entry(tld.to_string()).or_default())
    }

    /// Resolves the three registrar handles for `tld`. Never fails.
    pub async fn resolve(&self, tld: &str) -> RegistryHandles {
        let (legacy_registrar, permanent_registrar, controller) = tokio::join!(
            self.legacy_registrar(tld),
            self.permanent_registrar(tld),
            self.controller(tld),
        );
        RegistryHandles { legacy_registrar, permanent_registrar, controller }
    }

    /// Legacy auction registrar, published as an interface implementer on the tld resolver.
    pub async fn legacy_registrar(&self, tld: &str) -> Option<Arc<dyn LegacyRegistrar>> {
        let slots = self.slots(tld);
        let id = self.interfaces.legacy_registrar;
        init_handle(&slots.legacy_registrar, tld, "legacy_registrar", || async {
            let address = self.interface_implementer(tld, id).await?;
            Ok(self.connector.legacy_registrar(address))
        })
        .await
    }

    /// Permanent registrar, which owns the tld node in the registry.
    pub async fn permanent_registrar(&self, tld: &str) -> Option<Arc<dyn PermanentRegistrar>> {
        let slots = self.slots(tld);
        init_handle(&slots.permanent_registrar, tld, "permanent_registrar", || async {
            let address = non_zero(self.registry.owner(namehash(tld)).await?, "tld owner")?;
            Ok(self.connector.permanent_registrar(address))
        })
        .await
    }

    /// Registration controller, published as an interface implementer on the tld resolver.
    pub async fn controller(&self, tld: &str) -> Option<Arc<dyn RegistrarController>> {
        let slots = self.slots(tld);
        let id = self.interfaces.permanent_registrar;
        init_handle(&slots.controller, tld, "controller", || async {
            let address = self.interface_implementer(tld, id).await?;
            Ok(self.connector.controller(address))
        })
        .await
    }

    async fn interface_implementer(
        &self,
        tld: &str,
        interface_id: InterfaceId,
    ) -> Result<Address, HandleError> {
        let node = namehash(tld);
        let resolver = non_zero(self.registry.resolver(node).await?, "tld resolver")?;
        let implementer =
            self.connector.resolver(resolver).interface_implementer(node, interface_id).await?;
        non_zero(implementer, "interface implementer")
    }

    /// `GRACE_PERIOD()` of the tld's permanent registrar, cached once read.
    ///
    /// # Errors
    ///
    /// Propagates the read failure; nothing is cached in that case.
    pub async fn grace_period(
        &self,
        tld: &str,
        registrar: &dyn PermanentRegistrar,
    ) -> Result<u64, RpcError> {
        let slots = self.slots(tld);
        slots.grace_period.get_or_try_init(|| registrar.grace_period()).await.copied()
    }

    /// `minCommitmentAge()` of the tld's controller, cached once read.
    ///
    /// # Errors
    ///
    /// Propagates the read failure; nothing is cached in that case.
    pub async fn min_commitment_age(
        &self,
        tld: &str,
        controller: &dyn RegistrarController,
    ) -> Result<u64, RpcError> {
        let slots = self.slots(tld);
        slots.min_commitment_age.get_or_try_init(|| controller.min_commitment_age()).await.copied()
    }

    /// `maxCommitmentAge()` of the tld's controller, cached once read.
    ///
    /// # Errors
    ///
    /// Propagates the read failure; nothing is cached in that case.
    pub async fn max_commitment_age(
        &self,
        tld: &str,
        controller: &dyn RegistrarController,
    ) -> Result<u64, RpcError> {
        let slots = self.slots(tld);
        slots.max_commitment_age.get_or_try_init(|| controller.max_commitment_age()).await.copied()
    }
}

async fn init_handle<T, F, Fut>(
    cell: &OnceCell<Arc<T>>,
    tld: &str,
    handle: &'static str,
    init: F,
) -> Option<Arc<T>>
where
    T: ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Arc<T>, HandleError>>,
{
    match cell.get_or_try_init(init).await {
        Ok(value) => Some(Arc::clone(value)),
        Err(e) => {
            tracing::warn!(tld = %tld, handle, error = %e, "registrar handle unavailable");
            None
        }
    }
}

/// Why a handle slot stayed empty.
#[derive(Debug, thiserror::Error)]
enum HandleError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("{0} is the zero address")]
    ZeroAddress(&'static str),
}

fn non_zero(address: Address, what: &'static str) -> Result<Address, HandleError> {
    if address.is_zero() {
        Err(HandleError::ZeroAddress(what))
    } else {
        Ok(address)
    }
}

