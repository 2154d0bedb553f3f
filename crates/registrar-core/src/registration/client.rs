use std::sync::Arc;

use super::errors::RegistrationError;
use crate::{
    contracts::{calls, ChainContext, PermanentRegistrar, RegistrarController},
    namehash::{first_label, labelhash, namehash},
    registry::{entry::unix_to_date, RegistryCache},
    transaction::TransactionPolicy,
    types::{Address, Overrides, B256},
};

/// A submitted commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    pub commitment: B256,
    pub tx_hash: B256,
}

/// Commit-reveal registration and ownership operations against the permanent registrar.
///
/// Every operation propagates its failure. The commitment shape depends on the address of
/// `resolver.<tld>`: a zero address selects the `WithConfig` calls, anything else the plain
/// ones. Both [`Self::make_commitment`] and [`Self::register`] apply the same test for the same
/// tld.
pub struct RegistrationClient {
    cache: Arc<RegistryCache>,
    chain: Arc<dyn ChainContext>,
    policy: TransactionPolicy,
}

impl RegistrationClient {
    #[must_use]
    pub fn new(
        cache: Arc<RegistryCache>,
        chain: Arc<dyn ChainContext>,
        policy: TransactionPolicy,
    ) -> Self {
        Self { cache, chain, policy }
    }

    async fn controller(
        &self,
        tld: &str,
    ) -> Result<Arc<dyn RegistrarController>, RegistrationError> {
        self.cache.controller(tld).await.ok_or_else(|| RegistrationError::RegistryUnavailable {
            tld: tld.to_string(),
            contract: "registrar controller",
        })
    }

    async fn permanent_registrar(
        &self,
        tld: &str,
    ) -> Result<Arc<dyn PermanentRegistrar>, RegistrationError> {
        self.cache.permanent_registrar(tld).await.ok_or_else(|| {
            RegistrationError::RegistryUnavailable {
                tld: tld.to_string(),
                contract: "permanent registrar",
            }
        })
    }

    /// Address that `resolver.<tld>` resolves to; zero if it has no resolver.
    ///
    /// # Errors
    ///
    /// Propagates registry and resolver read failures.
    pub async fn default_resolver(&self, tld: &str) -> Result<Address, RegistrationError> {
        let node = namehash(&format!("resolver.{tld}"));
        let resolver = self.cache.registry().resolver(node).await?;
        if resolver.is_zero() {
            return Ok(Address::ZERO);
        }
        Ok(self.cache.connector().resolver(resolver).addr(node).await?)
    }

    /// Current rent price in wei for `duration` seconds. Never cached.
    ///
    /// # Errors
    ///
    /// Fails if the controller is unavailable or the read fails.
    pub async fn rent_price(
        &self,
        label: &str,
        duration: u64,
        tld: &str,
    ) -> Result<u128, RegistrationError> {
        let controller = self.controller(tld).await?;
        Ok(controller.rent_price(label, duration).await?)
    }

    /// Minimum age in seconds a commitment must reach before it can be revealed.
    ///
    /// # Errors
    ///
    /// Fails if the controller is unavailable or the read fails.
    pub async fn minimum_commitment_age(&self, tld: &str) -> Result<u64, RegistrationError> {
        let controller = self.controller(tld).await?;
        Ok(self.cache.min_commitment_age(tld, controller.as_ref()).await?)
    }

    /// Computes the commitment for registering `label` to `owner` with `secret`.
    ///
    /// # Errors
    ///
    /// Fails if the controller is unavailable or any read fails.
    pub async fn make_commitment(
        &self,
        label: &str,
        owner: Address,
        secret: B256,
        tld: &str,
    ) -> Result<B256, RegistrationError> {
        let controller = self.controller(tld).await?;
        let (resolver, account) = tokio::try_join!(self.default_resolver(tld), async {
            self.chain.account().await.map_err(RegistrationError::from)
        })?;
        commitment(controller.as_ref(), label, owner, secret, resolver, account).await
    }

    /// Commits to registering `label` to the active account.
    ///
    /// # Errors
    ///
    /// Fails if the commitment cannot be computed or the transaction is rejected.
    pub async fn commit(
        &self,
        label: &str,
        secret: B256,
        tld: &str,
    ) -> Result<CommitReceipt, RegistrationError> {
        let controller = self.controller(tld).await?;
        let account = self.chain.account().await?;
        let resolver = self.default_resolver(tld).await?;
        let commitment =
            commitment(controller.as_ref(), label, account, secret, resolver, account).await?;

        let tx_hash =
            self.chain.send_transaction(calls::commit(controller.address(), commitment)).await?;
        tracing::info!(
            label = %label,
            tld = %tld,
            commitment = %commitment,
            tx_hash = %tx_hash,
            "commitment submitted"
        );

        Ok(CommitReceipt { commitment, tx_hash })
    }

    /// Reveals a commitment and registers `label` to the active account for `duration` seconds.
    ///
    /// The commitment must exist and its age must lie within the controller's bounds, and the
    /// label must be available. The price is quoted at call time and attached as payment.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::CommitmentNotFound`], [`RegistrationError::CommitmentTooNew`] or
    ///   [`RegistrationError::CommitmentExpired`] when the commitment cannot be revealed
    /// - [`RegistrationError::Unavailable`] if the label is taken
    /// - [`RegistrationError::Underpriced`] if the node rejects the payment
    pub async fn register(
        &self,
        label: &str,
        duration: u64,
        secret: B256,
        tld: &str,
    ) -> Result<B256, RegistrationError> {
        let controller = self.controller(tld).await?;
        let account = self.chain.account().await?;
        let resolver = self.default_resolver(tld).await?;
        let commitment =
            commitment(controller.as_ref(), label, account, secret, resolver, account).await?;

        let (committed_at, min_age, max_age, now, available) = tokio::try_join!(
            controller.commitments(commitment),
            self.cache.min_commitment_age(tld, controller.as_ref()),
            self.cache.max_commitment_age(tld, controller.as_ref()),
            self.chain.block_timestamp(),
            controller.available(label),
        )?;

        check_commitment_age(commitment, committed_at, min_age, max_age, now)?;
        if !available {
            return Err(RegistrationError::Unavailable { label: label.to_string() });
        }

        let price = controller.rent_price(label, duration).await?;
        let tx = if resolver.is_zero() {
            calls::register_with_config(
                controller.address(),
                label,
                account,
                duration,
                secret,
                resolver,
                account,
            )
        } else {
            calls::register(controller.address(), label, account, duration, secret)
        };

        let tx_hash =
            self.chain.send_transaction(tx.with_overrides(Overrides::with_value(price))).await?;
        tracing::info!(
            label = %label,
            tld = %tld,
            duration,
            price = %price,
            with_config = resolver.is_zero(),
            tx_hash = %tx_hash,
            "registration submitted"
        );
        Ok(tx_hash)
    }

    /// Extends `label` by `duration` seconds, paying the current price.
    ///
    /// # Errors
    ///
    /// Fails if the controller is unavailable, the quote fails or the transaction is rejected.
    pub async fn renew(
        &self,
        label: &str,
        duration: u64,
        tld: &str,
    ) -> Result<B256, RegistrationError> {
        let controller = self.controller(tld).await?;
        let price = controller.rent_price(label, duration).await?;
        let tx = calls::renew(controller.address(), label, duration)
            .with_overrides(Overrides::with_value(price));
        let tx_hash = self.chain.send_transaction(tx).await?;
        tracing::info!(label = %label, duration, price = %price, tx_hash = %tx_hash, "renewal");
        Ok(tx_hash)
    }

    /// Transfers the permanent registrar token for `name` from the active account to `to`.
    ///
    /// # Errors
    ///
    /// Fails if the registrar is unavailable or the transaction is rejected.
    pub async fn transfer_owner(
        &self,
        name: &str,
        to: Address,
        tld: &str,
        overrides: Overrides,
    ) -> Result<B256, RegistrationError> {
        let registrar = self.permanent_registrar(tld).await?;
        let account = self.chain.account().await?;
        let tx = calls::safe_transfer_from(
            registrar.address(),
            account,
            to,
            labelhash(first_label(name)),
        );
        let tx_hash = self.policy.submit(self.chain.as_ref(), tx, overrides).await?;
        tracing::info!(name = %name, to = %to, tx_hash = %tx_hash, "ownership transfer submitted");
        Ok(tx_hash)
    }

    /// Sets the registry owner of `name` to `address` on behalf of the token holder.
    ///
    /// # Errors
    ///
    /// Fails if the registrar is unavailable or the transaction is rejected.
    pub async fn reclaim(
        &self,
        name: &str,
        address: Address,
        tld: &str,
        overrides: Overrides,
    ) -> Result<B256, RegistrationError> {
        let registrar = self.permanent_registrar(tld).await?;
        let tx = calls::reclaim(registrar.address(), labelhash(first_label(name)), address);
        let tx_hash = self.policy.submit(self.chain.as_ref(), tx, overrides).await?;
        tracing::info!(name = %name, address = %address, tx_hash = %tx_hash, "reclaim submitted");
        Ok(tx_hash)
    }

    /// Releases the legacy auction deed for `label`, refunding its deposit.
    ///
    /// # Errors
    ///
    /// Fails if the legacy registrar is unavailable or the transaction is rejected.
    pub async fn release_deed(&self, label: &str, tld: &str) -> Result<B256, RegistrationError> {
        let registrar = self.cache.legacy_registrar(tld).await.ok_or_else(|| {
            RegistrationError::RegistryUnavailable {
                tld: tld.to_string(),
                contract: "legacy registrar",
            }
        })?;
        let tx = calls::release_deed(registrar.address(), labelhash(label));
        let tx_hash = self.chain.send_transaction(tx).await?;
        tracing::info!(label = %label, tld = %tld, tx_hash = %tx_hash, "deed release submitted");
        Ok(tx_hash)
    }
}

/// Selects the commitment shape from the default resolver address.
async fn commitment(
    controller: &dyn RegistrarController,
    label: &str,
    owner: Address,
    secret: B256,
    resolver: Address,
    account: Address,
) -> Result<B256, RegistrationError> {
    let commitment = if resolver.is_zero() {
        controller.make_commitment_with_config(label, owner, secret, resolver, account).await?
    } else {
        controller.make_commitment(label, owner, secret).await?
    };
    Ok(commitment)
}

/// Checks that a commitment made at `committed_at` can be revealed at `now`.
///
/// The controller accepts a reveal once `committed_at + min_age <= now` and until
/// `committed_at + max_age > now`.
///
/// # Errors
///
/// Returns the commitment variant of [`RegistrationError`] that blocks the reveal.
pub fn check_commitment_age(
    commitment: B256,
    committed_at: u64,
    min_age: u64,
    max_age: u64,
    now: u64,
) -> Result<(), RegistrationError> {
    if committed_at == 0 {
        return Err(RegistrationError::CommitmentNotFound { commitment });
    }
    let ready_at = committed_at.saturating_add(min_age);
    if now < ready_at {
        return Err(RegistrationError::CommitmentTooNew { ready_at: unix_to_date(ready_at) });
    }
    let expires_at = committed_at.saturating_add(max_age);
    if now >= expires_at {
        return Err(RegistrationError::CommitmentExpired { expired_at: unix_to_date(expires_at) });
    }
    Ok(())
}
