//! Domain state reconciliation across the legacy and permanent registrars.
//!
//! # Components
//!
//! - [`cache`]: per-tld registrar handles and near-constant values
//! - [`legacy`]: auction-era entry, degraded to a zero entry on failure
//! - [`permanent`]: current registrar entry, unavailable on failure
//! - [`reconciler`]: merges both with chain time into a [`DomainEntry`]

pub mod cache;
pub mod entry;
pub mod legacy;
pub mod permanent;
pub mod reconciler;

pub use cache::{RegistrarInterfaces, RegistryCache, RegistryHandles};
pub use entry::{AuctionState, DomainEntry, LegacyEntry, PermanentEntry, SourceStatus, Sources};
pub use legacy::get_legacy_entry;
pub use permanent::get_permanent_entry;
pub use reconciler::{grace_period_end, in_grace_window, reconcile, DomainStateReconciler};
