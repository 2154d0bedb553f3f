use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{client::RpcClient, errors::RpcError};
use crate::{
    contracts::ChainContext,
    types::{Address, TxRequest, B256},
};

/// [`ChainContext`] backed by a JSON-RPC node.
///
/// The active account is either configured up front or taken from the first entry of
/// `eth_accounts`, resolved once on first use.
pub struct EthChainContext {
    client: Arc<RpcClient>,
    account: OnceCell<Address>,
}

impl EthChainContext {
    #[must_use]
    pub fn new(client: Arc<RpcClient>, account: Option<Address>) -> Self {
        Self { client, account: OnceCell::new_with(account) }
    }
}

#[async_trait]
impl ChainContext for EthChainContext {
    async fn block_timestamp(&self) -> Result<u64, RpcError> {
        self.client.block_timestamp().await
    }

    async fn account(&self) -> Result<Address, RpcError> {
        self.account
            .get_or_try_init(|| async {
                let accounts = self.client.accounts().await?;
                let account = accounts.first().copied().ok_or(RpcError::NoAccount)?;
                tracing::info!(account = %account, "using node account");
                Ok(account)
            })
            .await
            .copied()
    }

    async fn network_id(&self) -> Result<u64, RpcError> {
        self.client.net_version().await
    }

    async fn estimate_gas(&self, tx: &TxRequest) -> Result<u64, RpcError> {
        self.client.estimate_gas(tx).await
    }

    async fn send_transaction(&self, mut tx: TxRequest) -> Result<B256, RpcError> {
        if tx.from.is_none() {
            tx.from = Some(self.account().await?);
        }
        self.client.send_transaction(&tx).await
    }
}
