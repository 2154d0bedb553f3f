use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{Address, Lookup};

/// Length in seconds of the legacy auction reveal window preceding `registration_date`.
pub const REVEAL_WINDOW_SECS: u64 = 48 * 60 * 60;

/// Auction-era state of a label in the legacy registrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuctionState {
    Open,
    Auction,
    Owned,
    Forbidden,
    Reveal,
    NotYetAvailable,
    /// Raw value outside the known range.
    Unknown(u8),
}

impl From<u8> for AuctionState {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Open,
            1 => Self::Auction,
            2 => Self::Owned,
            3 => Self::Forbidden,
            4 => Self::Reveal,
            5 => Self::NotYetAvailable,
            other => Self::Unknown(other),
        }
    }
}

/// The Unix epoch, used as the zero date.
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    DateTime::default()
}

/// Converts unix seconds to a UTC date, clamping out-of-range values to the epoch.
#[must_use]
pub fn unix_to_date(seconds: u64) -> DateTime<Utc> {
    i64::try_from(seconds)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .unwrap_or_else(epoch)
}

/// Wei amounts as decimal strings.
///
/// JSON numbers lose precision above 2^53, and serde cannot buffer `u128` through a flattened
/// struct.
mod wei {
    use super::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalized legacy registrar entry for one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEntry {
    pub deed_owner: Address,
    pub state: AuctionState,
    pub registration_date: DateTime<Utc>,
    pub reveal_date: DateTime<Utc>,
    /// Wei.
    #[serde(with = "wei")]
    pub value: u128,
    /// Wei.
    #[serde(with = "wei")]
    pub highest_bid: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LegacyEntry {
    /// The zero entry returned when the legacy registrar cannot be read.
    #[must_use]
    pub fn zero(error: impl Into<String>) -> Self {
        Self {
            deed_owner: Address::ZERO,
            state: AuctionState::Open,
            registration_date: epoch(),
            reveal_date: epoch(),
            value: 0,
            highest_bid: 0,
            error: Some(error.into()),
        }
    }
}

/// Permanent registrar view of one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermanentEntry {
    pub available: bool,
    /// `None` when the registrar reports no expiry.
    pub name_expires: Option<DateTime<Utc>>,
    /// Grace period in seconds.
    pub grace_period: u64,
    /// `None` when the token has never been minted.
    pub owner_of: Option<Address>,
}

/// How a source contributed to a [`DomainEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "reason")]
pub enum SourceStatus {
    Fresh,
    Degraded(String),
    Unavailable(String),
}

impl<T> From<&Lookup<T>> for SourceStatus {
    fn from(lookup: &Lookup<T>) -> Self {
        match lookup {
            Lookup::Found(_) => Self::Fresh,
            Lookup::Degraded { reason, .. } => Self::Degraded(reason.clone()),
            Lookup::Unavailable { reason } => Self::Unavailable(reason.clone()),
        }
    }
}

/// Per-source read status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sources {
    pub legacy: SourceStatus,
    pub permanent: SourceStatus,
}

impl Sources {
    /// Returns `true` if both sources were read in full.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.legacy == SourceStatus::Fresh && self.permanent == SourceStatus::Fresh
    }
}

/// Reconciled lifecycle state of a label.
///
/// `registrant` and `is_new_registrar` follow the permanent registrar when it reports an owner.
/// Inside the grace window after expiry `is_new_registrar` is set while `registrant` stays `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEntry {
    pub current_block_date: DateTime<Utc>,
    pub registrant: Option<Address>,
    pub transfer_end_date: Option<DateTime<Utc>>,
    pub is_new_registrar: bool,
    pub grace_period_end_date: Option<DateTime<Utc>>,
    /// `None` when the permanent registrar could not be read.
    pub available: Option<bool>,
    pub expiry_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub legacy: LegacyEntry,
    pub sources: Sources,
}
