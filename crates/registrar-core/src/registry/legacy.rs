use super::entry::{unix_to_date, AuctionState, LegacyEntry, REVEAL_WINDOW_SECS};
use crate::{
    contracts::{ContractConnector, LegacyRegistrar},
    namehash::labelhash,
    rpc::RpcError,
    types::{Address, Lookup},
};

/// Reads the legacy auction entry for `label`.
///
/// When the entry names a deed, the deed is bound and its owner read. Any failure, including an
/// absent registrar, degrades to [`LegacyEntry::zero`] carrying the error.
pub async fn get_legacy_entry(
    connector: &dyn ContractConnector,
    registrar: Option<&dyn LegacyRegistrar>,
    label: &str,
) -> Lookup<LegacyEntry> {
    let Some(registrar) = registrar else {
        let reason = "legacy registrar unavailable".to_string();
        return Lookup::Degraded { value: LegacyEntry::zero(reason.clone()), reason };
    };

    match read_entry(connector, registrar, label).await {
        Ok(entry) => Lookup::Found(entry),
        Err(e) => {
            tracing::debug!(label = %label, error = %e, "legacy entry read failed");
            let reason = e.to_string();
            Lookup::Degraded { value: LegacyEntry::zero(reason.clone()), reason }
        }
    }
}

async fn read_entry(
    connector: &dyn ContractConnector,
    registrar: &dyn LegacyRegistrar,
    label: &str,
) -> Result<LegacyEntry, RpcError> {
    let raw = registrar.entries(labelhash(label)).await?;

    let deed_owner =
        if raw.deed.is_zero() { Address::ZERO } else { connector.deed(raw.deed).owner().await? };

    Ok(LegacyEntry {
        deed_owner,
        state: AuctionState::from(raw.state),
        registration_date: unix_to_date(raw.registration_date),
        reveal_date: unix_to_date(raw.registration_date.saturating_sub(REVEAL_WINDOW_SECS)),
        value: raw.value,
        highest_bid: raw.highest_bid,
        error: None,
    })
}
