//! Integration tests for commit-reveal registration.
//!
//! Covers:
//! - Commitment shape selection from the `resolver.<tld>` address, identical for commit and reveal
//! - Pre-flight checks that stop a reveal before any transaction is sent
//! - The price quoted at reveal time attached as payment
//! - Classification of rejected submissions

use crate::mock_infrastructure::{
    build_registrar, config_commitment, plain_commitment, FakeChain, FakeEns, ACCOUNT,
    CONTROLLER, DAY, LEGACY_REGISTRAR, NOW, OTHER_ACCOUNT, PUBLIC_RESOLVER, SECRET,
};
use registrar_core::{
    abi::selector,
    contracts::calls::{self, sig},
    namehash::{labelhash, namehash},
    registration::RegistrationError,
    registry::entry::unix_to_date,
    rpc::RpcError,
    types::Address,
};
use std::sync::Arc;

const YEAR: u64 = 365 * DAY;

/// Deployment of `eth` whose `resolver.eth` is unset.
fn without_default_resolver() -> Arc<FakeEns> {
    let ens = FakeEns::deployed();
    ens.update(|s| {
        s.resolvers.remove(&namehash("resolver.eth"));
    });
    ens
}

#[tokio::test]
async fn test_default_resolver_lookup() {
    let registrar = build_registrar(&FakeEns::deployed(), &FakeChain::mainnet(), None);
    assert_eq!(registrar.registration().default_resolver("eth").await.unwrap(), PUBLIC_RESOLVER);

    let registrar = build_registrar(&without_default_resolver(), &FakeChain::mainnet(), None);
    assert_eq!(registrar.registration().default_resolver("eth").await.unwrap(), Address::ZERO);
}

#[tokio::test]
async fn test_plain_commitment_with_default_resolver() {
    let ens = FakeEns::deployed();
    let registrar = build_registrar(&ens, &FakeChain::mainnet(), None);

    let commitment = registrar
        .registration()
        .make_commitment("newname", OTHER_ACCOUNT, SECRET, "eth")
        .await
        .unwrap();

    assert_eq!(commitment, plain_commitment("newname", OTHER_ACCOUNT, SECRET));
    assert_eq!(ens.calls("controller.makeCommitment"), 1);
    assert_eq!(ens.calls("controller.makeCommitmentWithConfig"), 0);
}

#[tokio::test]
async fn test_config_commitment_without_default_resolver() {
    let ens = without_default_resolver();
    let registrar = build_registrar(&ens, &FakeChain::mainnet(), None);

    let commitment = registrar
        .registration()
        .make_commitment("newname", OTHER_ACCOUNT, SECRET, "eth")
        .await
        .unwrap();

    assert_eq!(
        commitment,
        config_commitment("newname", OTHER_ACCOUNT, SECRET, Address::ZERO, ACCOUNT)
    );
    assert_eq!(ens.calls("controller.makeCommitment"), 0);
}

#[tokio::test]
async fn test_commit_submits_commitment() {
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    let receipt = registrar.registration().commit("newname", SECRET, "eth").await.unwrap();

    assert_eq!(receipt.commitment, plain_commitment("newname", ACCOUNT, SECRET));
    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], calls::commit(CONTROLLER, receipt.commitment));
}

#[tokio::test]
async fn test_commit_and_register_read_inputs_once() {
    let ens = FakeEns::deployed();
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&ens, &chain, None);
    let registration = registrar.registration();

    let receipt = registration.commit("newname", SECRET, "eth").await.unwrap();

    assert_eq!(chain.account_reads(), 1);
    assert_eq!(ens.calls("resolver.addr"), 1);
    assert_eq!(ens.calls("controller.makeCommitment"), 1);

    ens.update(|s| {
        s.commitments.insert(receipt.commitment, NOW);
    });
    chain.advance(60);
    registration.register("newname", YEAR, SECRET, "eth").await.unwrap();

    assert_eq!(chain.account_reads(), 2);
    assert_eq!(ens.calls("resolver.addr"), 2);
    assert_eq!(ens.calls("controller.makeCommitment"), 2);
}

#[tokio::test]
async fn test_commit_then_register() {
    let ens = FakeEns::deployed();
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&ens, &chain, None);
    let registration = registrar.registration();

    let receipt = registration.commit("newname", SECRET, "eth").await.unwrap();
    ens.update(|s| {
        s.commitments.insert(receipt.commitment, NOW);
    });
    chain.advance(60);

    registration.register("newname", YEAR, SECRET, "eth").await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 2);
    let expected = calls::register(CONTROLLER, "newname", ACCOUNT, YEAR, SECRET);
    assert_eq!(sent[1].data, expected.data);
    assert_eq!(sent[1].to, CONTROLLER);
    assert_eq!(sent[1].value, Some(1_000 * u128::from(YEAR)));
}

#[tokio::test]
async fn test_register_with_config_matches_commitment_shape() {
    let ens = without_default_resolver();
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&ens, &chain, None);
    let registration = registrar.registration();

    let receipt = registration.commit("newname", SECRET, "eth").await.unwrap();
    ens.update(|s| {
        s.commitments.insert(receipt.commitment, NOW);
    });
    chain.advance(3_600);

    registration.register("newname", YEAR, SECRET, "eth").await.unwrap();

    assert_eq!(ens.calls("controller.makeCommitmentWithConfig"), 2);
    assert_eq!(ens.calls("controller.makeCommitment"), 0);
    let sent = chain.sent();
    assert_eq!(sent[1].selector(), Some(selector(sig::REGISTER_WITH_CONFIG)));
    let expected = calls::register_with_config(
        CONTROLLER,
        "newname",
        ACCOUNT,
        YEAR,
        SECRET,
        Address::ZERO,
        ACCOUNT,
    );
    assert_eq!(sent[1].data, expected.data);
}

#[tokio::test]
async fn test_register_quotes_price_at_reveal() {
    let ens = FakeEns::deployed();
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&ens, &chain, None);
    let commitment = plain_commitment("newname", ACCOUNT, SECRET);
    ens.update(|s| {
        s.commitments.insert(commitment, NOW - 120);
        s.price_per_second = 3_000;
    });

    registrar.registration().register("newname", DAY, SECRET, "eth").await.unwrap();

    assert_eq!(chain.sent()[0].value, Some(3_000 * u128::from(DAY)));
    assert_eq!(ens.calls("controller.rentPrice"), 1);
}

#[tokio::test]
async fn test_register_without_commitment() {
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    let result = registrar.registration().register("newname", YEAR, SECRET, "eth").await;

    assert!(matches!(
        result,
        Err(RegistrationError::CommitmentNotFound { commitment })
            if commitment == plain_commitment("newname", ACCOUNT, SECRET)
    ));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_register_too_soon_after_commit() {
    let ens = FakeEns::deployed();
    let chain = FakeChain::mainnet();
    ens.update(|s| {
        s.commitments.insert(plain_commitment("newname", ACCOUNT, SECRET), NOW - 59);
    });
    let registrar = build_registrar(&ens, &chain, None);

    let result = registrar.registration().register("newname", YEAR, SECRET, "eth").await;

    assert!(matches!(
        result,
        Err(RegistrationError::CommitmentTooNew { ready_at })
            if ready_at == unix_to_date(NOW + 1)
    ));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_register_after_commitment_expired() {
    let ens = FakeEns::deployed();
    let chain = FakeChain::mainnet();
    ens.update(|s| {
        s.commitments.insert(plain_commitment("newname", ACCOUNT, SECRET), NOW - 7 * DAY);
    });
    let registrar = build_registrar(&ens, &chain, None);

    let result = registrar.registration().register("newname", YEAR, SECRET, "eth").await;

    assert!(matches!(result, Err(RegistrationError::CommitmentExpired { .. })));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_register_taken_label() {
    let ens = FakeEns::deployed();
    let chain = FakeChain::mainnet();
    ens.update(|s| {
        s.commitments.insert(plain_commitment("carol", ACCOUNT, SECRET), NOW - 120);
        s.register("carol", OTHER_ACCOUNT, NOW + YEAR);
    });
    let registrar = build_registrar(&ens, &chain, None);

    let result = registrar.registration().register("carol", YEAR, SECRET, "eth").await;

    assert!(matches!(result, Err(RegistrationError::Unavailable { label }) if label == "carol"));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_underpaid_reveal_is_classified() {
    let ens = FakeEns::deployed();
    let chain = FakeChain::mainnet();
    ens.update(|s| {
        s.commitments.insert(plain_commitment("newname", ACCOUNT, SECRET), NOW - 120);
    });
    chain.reject_next_send(3, "execution reverted: insufficient value");
    let registrar = build_registrar(&ens, &chain, None);

    let result = registrar.registration().register("newname", YEAR, SECRET, "eth").await;

    assert!(matches!(result, Err(RegistrationError::Underpriced(_))));
}

#[tokio::test]
async fn test_other_rejections_are_transport_errors() {
    let chain = FakeChain::mainnet();
    chain.reject_next_send(-32000, "nonce too low");
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    let result = registrar.registration().commit("newname", SECRET, "eth").await;

    assert!(matches!(result, Err(RegistrationError::Transport(RpcError::JsonRpc(-32000, _)))));
}

#[tokio::test]
async fn test_commit_without_account() {
    let chain = FakeChain::mainnet();
    chain.set_account(None);
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    let result = registrar.registration().commit("newname", SECRET, "eth").await;

    assert!(matches!(result, Err(RegistrationError::Transport(RpcError::NoAccount))));
}

#[tokio::test]
async fn test_unresolved_controller_is_reported() {
    let registrar = build_registrar(&FakeEns::deployed(), &FakeChain::mainnet(), None);

    let result = registrar.registration().commit("newname", SECRET, "test").await;

    assert!(matches!(
        result,
        Err(RegistrationError::RegistryUnavailable { ref tld, contract: "registrar controller" })
            if tld == "test"
    ));
}

#[tokio::test]
async fn test_renew_pays_current_price() {
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    registrar.registration().renew("carol", YEAR, "eth").await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent[0].data, calls::renew(CONTROLLER, "carol", YEAR).data);
    assert_eq!(sent[0].value, Some(1_000 * u128::from(YEAR)));
}

#[tokio::test]
async fn test_rent_price_is_not_cached() {
    let ens = FakeEns::deployed();
    let registrar = build_registrar(&ens, &FakeChain::mainnet(), None);

    assert_eq!(registrar.registration().rent_price("carol", 10, "eth").await.unwrap(), 10_000);
    ens.update(|s| s.price_per_second = 2_000);
    assert_eq!(registrar.registration().rent_price("carol", 10, "eth").await.unwrap(), 20_000);
}

#[tokio::test]
async fn test_release_deed_targets_legacy_registrar() {
    let chain = FakeChain::mainnet();
    let registrar = build_registrar(&FakeEns::deployed(), &chain, None);

    registrar.registration().release_deed("dave", "eth").await.unwrap();

    assert_eq!(chain.sent(), vec![calls::release_deed(LEGACY_REGISTRAR, labelhash("dave"))]);
}
