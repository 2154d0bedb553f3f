//! # Registrar Core
//!
//! Resolves the lifecycle state of ENS-style names across two registrar generations and drives
//! the commit-reveal registration protocol.
//!
//! - **[`registry`]**: per-tld registrar handle cache, legacy and permanent entry resolvers,
//!   and the reconciler that merges them with chain time into a [`DomainEntry`].
//!
//! - **[`dns`]**: DNSSEC-backed claim classification and proof submission for DNS tlds.
//!
//! - **[`registration`]**: commitments, reveal, renewal, transfers and deed release.
//!
//! - **[`transaction`]**: gas policy for private networks.
//!
//! - **[`contracts`]**: collaborator traits, calldata builders and JSON-RPC bindings.
//!
//! - **[`rpc`]**: HTTP JSON-RPC transport and the chain context.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Registrar                           │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────┐  │
//! │  │ DomainState      │ │ Registration     │ │ DnsClaim     │  │
//! │  │ Reconciler       │ │ Client           │ │ Verifier     │  │
//! │  └────────┬─────────┘ └────────┬─────────┘ └──────┬───────┘  │
//! │           │                    │                  │          │
//! │  ┌────────▼────────────────────▼─────────┐ ┌──────▼───────┐  │
//! │  │ RegistryCache (per-tld handles)       │ │ DnsProver    │  │
//! │  └────────┬──────────────────────────────┘ └──────────────┘  │
//! │           │                                                  │
//! │  ┌────────▼─────────┐        ┌─────────────────────────────┐ │
//! │  │ContractConnector │        │ ChainContext + Transaction  │ │
//! │  │ (eth bindings)   │        │ Policy                      │ │
//! │  └────────┬─────────┘        └──────────────┬──────────────┘ │
//! └───────────┼─────────────────────────────────┼────────────────┘
//!             └──────────────┬──────────────────┘
//!                            ▼
//!                     RpcClient (HTTP)
//! ```
//!
//! [`DomainEntry`]: registry::DomainEntry

pub mod abi;
pub mod config;
pub mod contracts;
pub mod dns;
pub mod logging;
pub mod namehash;
pub mod registrar;
pub mod registration;
pub mod registry;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod utils;

pub use registrar::{BuilderError, Registrar, RegistrarBuilder};
