//! Integration tests for the transaction policy on ownership operations.
//!
//! `transfer_owner` and `reclaim` go through the policy: on networks whose id is at most the
//! private-network threshold the gas limit is set to a multiple of the node's estimate, elsewhere
//! gas is left to the node. Caller overrides are applied first.

use crate::mock_infrastructure::{
    build_registrar, FakeChain, FakeEns, ACCOUNT, BASE_REGISTRAR, OTHER_ACCOUNT,
};
use registrar_core::{
    abi::selector,
    contracts::calls::{self, sig},
    namehash::labelhash,
    registration::RegistrationError,
    transaction::{TransactionConfig, TransactionPolicy},
    types::{Overrides, TxRequest},
};

#[tokio::test]
async fn test_transfer_on_private_network_doubles_estimate() {
    let chain = FakeChain::mainnet();
    chain.set_estimate(60_000);
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    registrar
        .registration()
        .transfer_owner("carol.eth", OTHER_ACCOUNT, "eth", Overrides::default())
        .await
        .unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].gas, Some(120_000));
    assert_eq!(sent[0].from, Some(ACCOUNT));
    assert_eq!(sent[0].to, BASE_REGISTRAR);
    assert_eq!(
        sent[0].data,
        calls::safe_transfer_from(BASE_REGISTRAR, ACCOUNT, OTHER_ACCOUNT, labelhash("carol")).data
    );

    let estimated = chain.estimated();
    assert_eq!(estimated.len(), 1);
    assert_eq!(estimated[0].gas, None, "estimates never carry a gas limit");
    assert_eq!(estimated[0].from, Some(ACCOUNT));
}

#[tokio::test]
async fn test_transfer_on_public_network_leaves_gas_to_node() {
    let chain = FakeChain::mainnet();
    chain.set_network_id(5_777);
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    registrar
        .registration()
        .transfer_owner("carol", OTHER_ACCOUNT, "eth", Overrides::default())
        .await
        .unwrap();

    assert_eq!(chain.sent()[0].gas, None);
    assert!(chain.estimated().is_empty());
}

#[tokio::test]
async fn test_threshold_is_inclusive() {
    let chain = FakeChain::mainnet();
    chain.set_network_id(1_000);
    chain.set_estimate(21_000);
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    registrar.registration().reclaim("carol", ACCOUNT, "eth", Overrides::default()).await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent[0].gas, Some(42_000));
    assert_eq!(sent[0].selector(), Some(selector(sig::RECLAIM)));
    assert_eq!(sent[0].data, calls::reclaim(BASE_REGISTRAR, labelhash("carol"), ACCOUNT).data);
}

#[tokio::test]
async fn test_overrides_apply_on_public_network() {
    let chain = FakeChain::mainnet();
    chain.set_network_id(5_777);
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    let overrides = Overrides { gas_limit: Some(90_000), value: Some(5) };
    registrar.registration().reclaim("carol", ACCOUNT, "eth", overrides).await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent[0].gas, Some(90_000));
    assert_eq!(sent[0].value, Some(5));
}

#[tokio::test]
async fn test_transfer_requires_permanent_registrar() {
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&FakeEns::empty(), &chain, None);

    let result = registrar
        .registration()
        .transfer_owner("carol", OTHER_ACCOUNT, "eth", Overrides::default())
        .await;

    assert!(matches!(
        result,
        Err(RegistrationError::RegistryUnavailable { contract: "permanent registrar", .. })
    ));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_custom_policy_threshold_and_multiplier() {
    let chain = FakeChain::mainnet();
    chain.set_network_id(1_337);
    chain.set_estimate(10_000);
    let policy = TransactionPolicy::new(TransactionConfig {
        private_network_max_id: 2_000,
        gas_multiplier: 3,
    });

    let tx = TxRequest::new(BASE_REGISTRAR, vec![0xde, 0xad, 0xbe, 0xef]);
    let prepared = policy.prepare(chain.as_ref(), tx, Overrides::default()).await.unwrap();

    assert_eq!(prepared.gas, Some(30_000));
    assert_eq!(prepared.from, Some(ACCOUNT));
    assert!(chain.sent().is_empty(), "prepare never submits");
}
