use super::{
    cache::RegistryCache,
    entry::{unix_to_date, PermanentEntry},
};
use crate::{
    contracts::{PermanentRegistrar, RegistrarController},
    namehash::{is_encoded_labelhash, labelhash},
    rpc::RpcError,
    types::{Address, Lookup, B256},
};

/// Reads the permanent registrar view of `label` under `tld`.
///
/// Encoded labels are checked with the registrar's `available`, plain labels with the
/// controller's, which also applies label validity rules. Availability, expiry and the cached
/// grace period are read together; if any of them fails the result is
/// [`Lookup::Unavailable`]. `ownerOf` is read afterwards and its failure means the token was
/// never minted.
pub async fn get_permanent_entry(
    cache: &RegistryCache,
    tld: &str,
    registrar: Option<&dyn PermanentRegistrar>,
    controller: Option<&dyn RegistrarController>,
    label: &str,
) -> Lookup<PermanentEntry> {
    let Some(registrar) = registrar else {
        return Lookup::Unavailable { reason: "permanent registrar unavailable".to_string() };
    };
    let encoded = is_encoded_labelhash(label);
    if !encoded && controller.is_none() {
        return Lookup::Unavailable { reason: "registrar controller unavailable".to_string() };
    }

    let label_hash = labelhash(label);
    let available = async {
        match controller {
            Some(controller) if !encoded => controller.available(label).await,
            _ => registrar.available(label_hash).await,
        }
    };

    let (available, name_expires, grace_period) = match tokio::try_join!(
        available,
        registrar.name_expires(label_hash),
        cache.grace_period(tld, registrar),
    ) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(label = %label, tld = %tld, error = %e, "permanent entry read failed");
            return Lookup::Unavailable { reason: e.to_string() };
        }
    };

    Lookup::Found(PermanentEntry {
        available,
        name_expires: (name_expires > 0).then(|| unix_to_date(name_expires)),
        grace_period,
        owner_of: owner_of(registrar, label_hash).await,
    })
}

async fn owner_of(registrar: &dyn PermanentRegistrar, label_hash: B256) -> Option<Address> {
    match registrar.owner_of(label_hash).await {
        Ok(owner) if !owner.is_zero() => Some(owner),
        Ok(_) => None,
        Err(e) => {
            log_owner_of_failure(&e);
            None
        }
    }
}

fn log_owner_of_failure(e: &RpcError) {
    if e.is_execution_error() {
        tracing::trace!(error = %e, "ownerOf reverted, token not minted");
    } else {
        tracing::debug!(error = %e, "ownerOf read failed, treating as unowned");
    }
}
