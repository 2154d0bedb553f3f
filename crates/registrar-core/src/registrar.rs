//! Top-level entry point wiring the registrar components together.

use std::sync::Arc;
use thiserror::Error;

use crate::{
    config::AppConfig,
    contracts::{eth::EthConnector, ChainContext, ContractConnector},
    dns::{is_dns_tld, DnsClaimVerifier, DnsProver},
    registration::RegistrationClient,
    registry::{DomainEntry, DomainStateReconciler, RegistryCache, RegistryHandles},
    rpc::{EthChainContext, RpcClient, RpcError},
    transaction::TransactionPolicy,
};

/// Errors that can occur during registrar construction.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client initialization failed.
    #[error("Failed to initialize RPC client: {0}")]
    RpcClientInit(String),
}

/// Reconciliation, registration and DNS claims behind one shared handle cache.
pub struct Registrar {
    cache: Arc<RegistryCache>,
    reconciler: DomainStateReconciler,
    registration: RegistrationClient,
    dns: Option<DnsClaimVerifier>,
    default_tld: String,
    dns_tlds: Arc<[String]>,
}

impl Registrar {
    #[must_use]
    pub fn builder() -> RegistrarBuilder {
        RegistrarBuilder::new()
    }

    #[must_use]
    pub fn default_tld(&self) -> &str {
        &self.default_tld
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<RegistryCache> {
        &self.cache
    }

    #[must_use]
    pub fn registration(&self) -> &RegistrationClient {
        &self.registration
    }

    /// DNS claim verifier, present when a prover was supplied.
    #[must_use]
    pub fn dns(&self) -> Option<&DnsClaimVerifier> {
        self.dns.as_ref()
    }

    /// Returns `true` if `tld` is served by the DNS registrar.
    #[must_use]
    pub fn is_dns_registrar(&self, tld: &str) -> bool {
        is_dns_tld(&self.dns_tlds, tld)
    }

    pub async fn resolve_handles(&self, tld: &str) -> RegistryHandles {
        self.cache.resolve(tld).await
    }

    /// Reconciled state of `name` under `tld`, or under the default tld when `tld` is `None`.
    ///
    /// # Errors
    ///
    /// Fails only if the current block cannot be read.
    pub async fn get_entry(
        &self,
        name: &str,
        tld: Option<&str>,
    ) -> Result<DomainEntry, RpcError> {
        self.reconciler.get_entry(name, tld.unwrap_or(&self.default_tld)).await
    }
}

/// Builder for [`Registrar`].
///
/// Collaborators that are not supplied are created from the configuration: an [`RpcClient`]
/// for `rpc.url` backs both the contract bindings and the chain context.
///
/// # Examples
///
/// ```no_run
/// # use registrar_core::{config::AppConfig, registrar::Registrar};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registrar = Registrar::builder().config(AppConfig::load()?).build()?;
/// let entry = registrar.get_entry("alice", None).await?;
/// println!("available: {:?}", entry.available);
/// # Ok(())
/// # }
/// ```
pub struct RegistrarBuilder {
    config: AppConfig,
    connector: Option<Arc<dyn ContractConnector>>,
    chain: Option<Arc<dyn ChainContext>>,
    prover: Option<Arc<dyn DnsProver>>,
}

impl RegistrarBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { config: AppConfig::default(), connector: None, chain: None, prover: None }
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the contract connector (default: JSON-RPC bindings).
    #[must_use]
    pub fn connector(mut self, connector: Arc<dyn ContractConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Sets the chain context (default: JSON-RPC chain context).
    #[must_use]
    pub fn chain(mut self, chain: Arc<dyn ChainContext>) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Enables DNS claims through `prover`.
    #[must_use]
    pub fn prover(mut self, prover: Arc<dyn DnsProver>) -> Self {
        self.prover = Some(prover);
        self
    }

    /// Builds the [`Registrar`].
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidConfig` if the configuration does not validate.
    /// Returns `BuilderError::RpcClientInit` if the RPC client is needed and cannot be built.
    pub fn build(self) -> Result<Registrar, BuilderError> {
        let config = self.config;
        config.validate().map_err(BuilderError::InvalidConfig)?;

        let mut client = None;
        let connector: Arc<dyn ContractConnector> = match self.connector {
            Some(connector) => connector,
            None => Arc::new(EthConnector::new(
                shared_client(&config, &mut client)?,
                config.registry.ens_registry,
            )),
        };
        let chain: Arc<dyn ChainContext> = match self.chain {
            Some(chain) => chain,
            None => Arc::new(EthChainContext::new(
                shared_client(&config, &mut client)?,
                config.rpc.account,
            )),
        };

        let cache = Arc::new(RegistryCache::new(connector, config.registrar_interfaces()));
        let reconciler = DomainStateReconciler::new(Arc::clone(&cache), Arc::clone(&chain));
        let registration = RegistrationClient::new(
            Arc::clone(&cache),
            Arc::clone(&chain),
            TransactionPolicy::new(config.transaction),
        );
        let dns_tlds: Arc<[String]> = config.registry.dns_tlds.into();
        let dns = self.prover.map(|prover| {
            DnsClaimVerifier::new(prover, Arc::clone(&chain), Arc::clone(&dns_tlds))
        });

        tracing::debug!(
            default_tld = %config.registry.default_tld,
            registry = %config.registry.ens_registry,
            dns_enabled = dns.is_some(),
            "registrar built"
        );

        Ok(Registrar {
            cache,
            reconciler,
            registration,
            dns,
            default_tld: config.registry.default_tld,
            dns_tlds,
        })
    }
}

/// Returns the client in `slot`, creating it from `config` on first use.
fn shared_client(
    config: &AppConfig,
    slot: &mut Option<Arc<RpcClient>>,
) -> Result<Arc<RpcClient>, BuilderError> {
    if let Some(client) = slot {
        return Ok(Arc::clone(client));
    }
    let client = RpcClient::new(
        config.rpc.url.clone(),
        config.rpc_timeout(),
        config.http_client_config(),
    )
    .map_err(|e| BuilderError::RpcClientInit(e.to_string()))?;
    let client = Arc::new(client);
    *slot = Some(Arc::clone(&client));
    Ok(client)
}

impl Default for RegistrarBuilder {
    fn default() -> Self {
        Self::new()
    }
}
