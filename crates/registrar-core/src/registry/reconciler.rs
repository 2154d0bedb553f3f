use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

use super::{
    cache::RegistryCache,
    entry::{unix_to_date, DomainEntry, LegacyEntry, PermanentEntry, Sources},
    legacy::get_legacy_entry,
    permanent::get_permanent_entry,
};
use crate::{contracts::ChainContext, namehash::first_label, rpc::RpcError, types::Lookup};

/// Builds a [`DomainEntry`] from the legacy registrar, the permanent registrar and chain time.
pub struct DomainStateReconciler {
    cache: Arc<RegistryCache>,
    chain: Arc<dyn ChainContext>,
}

impl DomainStateReconciler {
    #[must_use]
    pub fn new(cache: Arc<RegistryCache>, chain: Arc<dyn ChainContext>) -> Self {
        Self { cache, chain }
    }

    /// Resolves the lifecycle state of `name` under `tld`.
    ///
    /// `name` may be a bare label or a full name, in which case its first label is used. The
    /// block, legacy and permanent reads run concurrently and are merged only once all three
    /// complete.
    ///
    /// # Errors
    ///
    /// Only a failed block read fails the call. Registrar read failures are recorded in
    /// [`DomainEntry::sources`].
    pub async fn get_entry(&self, name: &str, tld: &str) -> Result<DomainEntry, RpcError> {
        let label = first_label(name);
        let handles = self.cache.resolve(tld).await;

        let (block_time, legacy, permanent) = tokio::join!(
            self.chain.block_timestamp(),
            get_legacy_entry(
                self.cache.connector().as_ref(),
                handles.legacy_registrar.as_deref(),
                label
            ),
            get_permanent_entry(
                &self.cache,
                tld,
                handles.permanent_registrar.as_deref(),
                handles.controller.as_deref(),
                label,
            ),
        );

        let block_time = block_time?;
        let entry = reconcile(unix_to_date(block_time), legacy, permanent);

        tracing::debug!(
            label = %label,
            tld = %tld,
            available = ?entry.available,
            is_new_registrar = entry.is_new_registrar,
            complete = entry.sources.is_complete(),
            "domain entry reconciled"
        );

        Ok(entry)
    }
}

/// End of the grace window that starts at `expires`. Saturates at the maximum date.
#[must_use]
pub fn grace_period_end(expires: DateTime<Utc>, grace_period_secs: u64) -> DateTime<Utc> {
    i64::try_from(grace_period_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|grace| expires.checked_add_signed(grace))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Returns `true` if `now` lies strictly between `expires` and `grace_end`.
#[must_use]
pub fn in_grace_window(
    now: DateTime<Utc>,
    expires: DateTime<Utc>,
    grace_end: DateTime<Utc>,
) -> bool {
    expires < now && now < grace_end
}

/// Merges registrar reads into a [`DomainEntry`].
///
/// A permanent owner makes the permanent registrar authoritative. Without one, an expiry whose
/// grace window contains `now` marks the entry as held by the permanent registrar while leaving
/// `registrant` unset.
#[must_use]
pub fn reconcile(
    now: DateTime<Utc>,
    legacy: Lookup<LegacyEntry>,
    permanent: Lookup<PermanentEntry>,
) -> DomainEntry {
    let sources = Sources { legacy: (&legacy).into(), permanent: (&permanent).into() };
    let legacy = match legacy {
        Lookup::Found(entry) | Lookup::Degraded { value: entry, .. } => entry,
        Lookup::Unavailable { reason } => LegacyEntry::zero(reason),
    };

    let mut entry = DomainEntry {
        current_block_date: now,
        registrant: None,
        transfer_end_date: None,
        is_new_registrar: false,
        grace_period_end_date: None,
        available: None,
        expiry_time: None,
        legacy,
        sources,
    };

    let Some(permanent) = permanent.into_value() else {
        return entry;
    };

    entry.available = Some(permanent.available);
    entry.expiry_time = permanent.name_expires;

    if let Some(owner) = permanent.owner_of {
        entry.registrant = Some(owner);
        entry.is_new_registrar = true;
    } else if let Some(expires) = permanent.name_expires {
        let grace_end = grace_period_end(expires, permanent.grace_period);
        if in_grace_window(now, expires, grace_end) {
            entry.is_new_registrar = true;
            entry.grace_period_end_date = Some(grace_end);
        }
    }

    entry
}
