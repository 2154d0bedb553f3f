//! JSON-RPC transport to an Ethereum node.
//!
//! - [`HttpClient`]: pooled HTTP transport with a concurrency semaphore and retry on 5xx
//! - [`RpcClient`]: typed JSON-RPC methods over a single node URL
//! - [`EthChainContext`]: the [`ChainContext`](crate::contracts::ChainContext) used in
//!   production

pub mod chain;
pub mod client;
pub mod errors;
pub mod http_client;
pub mod types;

pub use chain::EthChainContext;
pub use client::RpcClient;
pub use errors::{RpcError, RpcErrorCategory};
pub use http_client::{HttpClient, HttpClientConfig};
