//! Integration tests for the JSON-RPC contract bindings and chain context.
//!
//! A mockito server plays the node. These tests verify that:
//! - A registrar built from configuration alone reconciles a name over JSON-RPC
//! - Return words decode into registry values and reverts are classified as execution errors
//! - The chain context resolves its account once and reads network id and block time
//! - The transaction policy sends the doubled estimate to the node on private networks

use crate::mock_infrastructure::{
    return_data, word_address, word_b256, word_bool, word_uint, RpcMockBuilder, ACCOUNT,
    BASE_REGISTRAR, CONTROLLER, DAY, GRACE_PERIOD, LEGACY_REGISTRAR, NOW, OTHER_ACCOUNT,
    REGISTRY, TLD_RESOLVER,
};
use registrar_core::{
    config::AppConfig,
    contracts::{calls::sig, eth::EthConnector, ChainContext, ContractConnector},
    namehash::{labelhash, namehash},
    registry::{entry::unix_to_date, AuctionState, RegistrarInterfaces},
    rpc::{EthChainContext, HttpClientConfig, RpcClient, RpcError},
    transaction::TransactionPolicy,
    types::{Overrides, TxRequest, B256},
    Registrar,
};
use std::{sync::Arc, time::Duration};

fn client(mock: &RpcMockBuilder) -> Arc<RpcClient> {
    Arc::new(
        RpcClient::new(mock.url(), Duration::from_secs(5), HttpClientConfig::default()).unwrap(),
    )
}

fn registrar(mock: &RpcMockBuilder) -> Registrar {
    let mut config = AppConfig::default();
    config.rpc.url = mock.url();
    config.registry.ens_registry = REGISTRY;
    Registrar::builder().config(config).build().unwrap()
}

/// Publishes the `eth` registrars on the mocked registry and tld resolver.
fn mock_deployment(mock: &mut RpcMockBuilder) {
    let node = word_b256(namehash("eth"));
    let interfaces = RegistrarInterfaces::default();
    let legacy_args = format!("{node}{}", hex::encode(interfaces.legacy_registrar.0));
    let controller_args = format!("{node}{}", hex::encode(interfaces.permanent_registrar.0));

    mock.mock_eth_call_with_args(
        REGISTRY,
        sig::RESOLVER,
        &node,
        &return_data(&[word_address(TLD_RESOLVER)]),
    )
    .mock_eth_call_with_args(
        REGISTRY,
        sig::OWNER_NODE,
        &node,
        &return_data(&[word_address(BASE_REGISTRAR)]),
    )
    .mock_eth_call_with_args(
        TLD_RESOLVER,
        sig::INTERFACE_IMPLEMENTER,
        &legacy_args,
        &return_data(&[word_address(LEGACY_REGISTRAR)]),
    )
    .mock_eth_call_with_args(
        TLD_RESOLVER,
        sig::INTERFACE_IMPLEMENTER,
        &controller_args,
        &return_data(&[word_address(CONTROLLER)]),
    )
    .mock_eth_call(
        BASE_REGISTRAR,
        sig::GRACE_PERIOD,
        &return_data(&[word_uint(GRACE_PERIOD.into())]),
    )
    .mock_latest_block(18_000_000, NOW);
}

/// Legacy `entries` tuple: state, deed, registration date, value, highest bid.
fn mock_legacy_entry(mock: &mut RpcMockBuilder, state: u8, registered: u64, value: u128) {
    mock.mock_eth_call(
        LEGACY_REGISTRAR,
        sig::ENTRIES,
        &return_data(&[
            word_uint(state.into()),
            word_uint(0),
            word_uint(registered.into()),
            word_uint(value),
            word_uint(value * 2),
        ]),
    );
}

#[tokio::test]
async fn test_expired_name_reconciled_over_json_rpc() {
    let mut mock = RpcMockBuilder::new().await;
    mock_deployment(&mut mock);
    mock_legacy_entry(&mut mock, 2, NOW - 700 * DAY, 10_000_000_000_000_000);
    let expires = NOW - 10 * DAY;
    mock.mock_eth_call(CONTROLLER, sig::AVAILABLE_LABEL, &return_data(&[word_bool(false)]))
        .mock_eth_call(
            BASE_REGISTRAR,
            sig::NAME_EXPIRES,
            &return_data(&[word_uint(expires.into())]),
        )
        .mock_eth_call_revert(BASE_REGISTRAR, sig::OWNER_OF, "ERC721: invalid token ID");

    let entry = registrar(&mock).get_entry("bob", None).await.unwrap();

    assert_eq!(entry.current_block_date, unix_to_date(NOW));
    assert_eq!(entry.registrant, None);
    assert!(entry.is_new_registrar);
    assert_eq!(entry.available, Some(false));
    assert_eq!(entry.expiry_time, Some(unix_to_date(expires)));
    assert_eq!(entry.grace_period_end_date, Some(unix_to_date(expires + GRACE_PERIOD)));
    assert_eq!(entry.legacy.state, AuctionState::Owned);
    assert_eq!(entry.legacy.value, 10_000_000_000_000_000);
    assert_eq!(entry.legacy.highest_bid, 20_000_000_000_000_000);
    assert!(entry.legacy.deed_owner.is_zero());
    assert!(entry.sources.is_complete(), "a reverting ownerOf is not a failed read");
}

#[tokio::test]
async fn test_owned_name_reconciled_over_json_rpc() {
    let mut mock = RpcMockBuilder::new().await;
    mock_deployment(&mut mock);
    mock_legacy_entry(&mut mock, 0, 0, 0);
    mock.mock_eth_call(CONTROLLER, sig::AVAILABLE_LABEL, &return_data(&[word_bool(false)]))
        .mock_eth_call(
            BASE_REGISTRAR,
            sig::NAME_EXPIRES,
            &return_data(&[word_uint((NOW + 300 * DAY).into())]),
        )
        .mock_eth_call(BASE_REGISTRAR, sig::OWNER_OF, &return_data(&[word_address(OTHER_ACCOUNT)]));

    let entry = registrar(&mock).get_entry("carol.eth", Some("eth")).await.unwrap();

    assert_eq!(entry.registrant, Some(OTHER_ACCOUNT));
    assert!(entry.is_new_registrar);
    assert_eq!(entry.grace_period_end_date, None);
}

#[tokio::test]
async fn test_revert_is_an_execution_error() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_eth_call_revert(BASE_REGISTRAR, sig::OWNER_OF, "ERC721: invalid token ID");
    let connector = EthConnector::new(client(&mock), REGISTRY);

    let err = connector
        .permanent_registrar(BASE_REGISTRAR)
        .owner_of(labelhash("nobody"))
        .await
        .unwrap_err();

    assert!(err.is_execution_error(), "got {err:?}");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_short_return_data_is_an_abi_error() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_eth_call(BASE_REGISTRAR, sig::NAME_EXPIRES, "0x01");
    let connector = EthConnector::new(client(&mock), REGISTRY);

    let result = connector.permanent_registrar(BASE_REGISTRAR).name_expires(labelhash("x")).await;

    assert!(matches!(result, Err(RpcError::Abi(_))), "got {result:?}");
}

#[tokio::test]
async fn test_controller_reads_decode() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_eth_call(CONTROLLER, sig::MIN_COMMITMENT_AGE, &return_data(&[word_uint(60)]))
        .mock_eth_call(CONTROLLER, sig::RENT_PRICE, &return_data(&[word_uint(3_170_979_198_376)]))
        .mock_eth_call(CONTROLLER, sig::AVAILABLE_LABEL, &return_data(&[word_bool(true)]));
    let controller = EthConnector::new(client(&mock), REGISTRY).controller(CONTROLLER);

    assert_eq!(controller.min_commitment_age().await.unwrap(), 60);
    assert_eq!(controller.rent_price("newname", 1).await.unwrap(), 3_170_979_198_376);
    assert!(controller.available("newname").await.unwrap());
    assert_eq!(controller.address(), CONTROLLER);
}

#[tokio::test]
async fn test_chain_context_reads() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_net_version(1_337).mock_accounts(&[ACCOUNT, OTHER_ACCOUNT]).mock_latest_block(7, NOW);
    let chain = EthChainContext::new(client(&mock), None);

    assert_eq!(chain.network_id().await.unwrap(), 1_337);
    assert_eq!(chain.account().await.unwrap(), ACCOUNT);
    assert_eq!(chain.account().await.unwrap(), ACCOUNT);
    assert_eq!(chain.block_timestamp().await.unwrap(), NOW);
    assert!(mock.verify_all_called());
}

#[tokio::test]
async fn test_configured_account_skips_node_accounts() {
    let mock = RpcMockBuilder::new().await;
    let chain = EthChainContext::new(client(&mock), Some(OTHER_ACCOUNT));

    assert_eq!(chain.account().await.unwrap(), OTHER_ACCOUNT);
}

#[tokio::test]
async fn test_node_without_accounts() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_accounts(&[]);
    let chain = EthChainContext::new(client(&mock), None);

    assert!(matches!(chain.account().await, Err(RpcError::NoAccount)));
}

#[tokio::test]
async fn test_policy_submits_doubled_estimate() {
    let tx_hash = format!("0x{}", "ab".repeat(32));
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_net_version(1)
        .mock_accounts(&[ACCOUNT])
        .mock_estimate_gas(50_000)
        .mock_send_transaction(&tx_hash, Some(100_000));
    let chain = EthChainContext::new(client(&mock), None);

    let tx = TxRequest::new(BASE_REGISTRAR, vec![0x28, 0xed, 0x4f, 0x6c]);
    let hash = TransactionPolicy::default().submit(&chain, tx, Overrides::default()).await.unwrap();

    assert_eq!(hash, B256([0xab; 32]));
    assert!(mock.verify_all_called());
}

#[tokio::test]
async fn test_node_error_surfaces_as_json_rpc_error() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_rpc_error("net_version", -32603, "Internal error");
    let chain = EthChainContext::new(client(&mock), None);

    let err = chain.network_id().await.unwrap_err();

    assert!(matches!(err, RpcError::JsonRpc(-32603, _)));
    assert!(!err.is_execution_error());
}
