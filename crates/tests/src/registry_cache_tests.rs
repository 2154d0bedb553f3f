//! Integration tests for the per-tld registrar handle cache.
//!
//! Verifies that:
//! - A resolved handle is returned as the same `Arc` on every later call
//! - Concurrent first callers share one resolution
//! - Failed or zero-address resolutions store nothing and are retried
//! - Each tld resolves independently
//! - Near-constant registrar values are read once

use crate::mock_infrastructure::{build_registrar, FakeChain, FakeEns, BASE_REGISTRAR, CONTROLLER};
use registrar_core::registry::{RegistrarInterfaces, RegistryCache};
use std::sync::Arc;

fn cache(ens: &Arc<FakeEns>) -> RegistryCache {
    RegistryCache::new(ens.connector(), RegistrarInterfaces::default())
}

#[tokio::test]
async fn test_handles_are_resolved_once_and_shared() {
    let ens = FakeEns::deployed();
    let cache = cache(&ens);

    let first = cache.permanent_registrar("eth").await.unwrap();
    let second = cache.permanent_registrar("eth").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.address(), BASE_REGISTRAR);
    assert_eq!(ens.calls("registry.owner"), 1);

    let controller = cache.controller("eth").await.unwrap();
    let again = cache.resolve("eth").await;
    assert!(Arc::ptr_eq(&controller, again.controller.as_ref().unwrap()));
    assert_eq!(controller.address(), CONTROLLER);
}

#[tokio::test]
async fn test_concurrent_first_callers_share_one_resolution() {
    let ens = FakeEns::deployed();
    let cache = cache(&ens);

    let (a, b, c) = tokio::join!(cache.resolve("eth"), cache.resolve("eth"), cache.resolve("eth"));

    assert!(Arc::ptr_eq(a.controller.as_ref().unwrap(), b.controller.as_ref().unwrap()));
    assert!(Arc::ptr_eq(
        b.legacy_registrar.as_ref().unwrap(),
        c.legacy_registrar.as_ref().unwrap()
    ));
    assert_eq!(ens.calls("resolver.interfaceImplementer"), 2, "one per interface");
    assert_eq!(ens.calls("registry.owner"), 1);
}

#[tokio::test]
async fn test_failed_resolution_is_retried() {
    let ens = FakeEns::deployed();
    ens.fail("registry.owner", 1);
    let cache = cache(&ens);

    assert!(cache.permanent_registrar("eth").await.is_none());
    assert!(cache.permanent_registrar("eth").await.is_some());
    assert!(cache.permanent_registrar("eth").await.is_some());

    assert_eq!(ens.calls("registry.owner"), 2);
}

#[tokio::test]
async fn test_zero_address_is_absent_and_not_stored() {
    let ens = FakeEns::empty();
    let cache = cache(&ens);

    let handles = cache.resolve("eth").await;
    assert!(handles.legacy_registrar.is_none());
    assert!(handles.permanent_registrar.is_none());
    assert!(handles.controller.is_none());

    ens.update(|s| s.deploy_tld("eth"));

    let handles = cache.resolve("eth").await;
    assert!(handles.legacy_registrar.is_some());
    assert!(handles.permanent_registrar.is_some());
    assert!(handles.controller.is_some());
}

#[tokio::test]
async fn test_tlds_resolve_independently() {
    let ens = FakeEns::deployed();
    let cache = cache(&ens);

    assert!(cache.permanent_registrar("eth").await.is_some());
    assert!(cache.permanent_registrar("test").await.is_none());

    ens.update(|s| s.deploy_tld("test"));
    let eth = cache.permanent_registrar("eth").await.unwrap();
    let test = cache.permanent_registrar("test").await.unwrap();

    assert!(!Arc::ptr_eq(&eth, &test));
    assert_eq!(ens.calls("registry.owner"), 3);
}

#[tokio::test]
async fn test_grace_period_is_read_once() {
    let ens = FakeEns::deployed();
    let registrar = build_registrar(&ens, &FakeChain::mainnet(), None);

    registrar.get_entry("alice", None).await.unwrap();
    registrar.get_entry("bob", None).await.unwrap();
    registrar.get_entry("carol", None).await.unwrap();

    assert_eq!(ens.calls("base.GRACE_PERIOD"), 1);
    assert_eq!(ens.calls("base.nameExpires"), 3);
}

#[tokio::test]
async fn test_failed_grace_period_read_is_not_cached() {
    let ens = FakeEns::deployed();
    ens.fail("base.GRACE_PERIOD", 1);
    let registrar = build_registrar(&ens, &FakeChain::mainnet(), None);

    let first = registrar.get_entry("alice", None).await.unwrap();
    let second = registrar.get_entry("alice", None).await.unwrap();

    assert_eq!(first.available, None);
    assert_eq!(second.available, Some(true));
    assert_eq!(ens.calls("base.GRACE_PERIOD"), 2);
}

#[tokio::test]
async fn test_minimum_commitment_age_is_cached() {
    let ens = FakeEns::deployed();
    let registrar = build_registrar(&ens, &FakeChain::mainnet(), None);

    assert_eq!(registrar.registration().minimum_commitment_age("eth").await.unwrap(), 60);
    ens.update(|s| s.min_commitment_age = 120);
    assert_eq!(registrar.registration().minimum_commitment_age("eth").await.unwrap(), 60);

    assert_eq!(ens.calls("controller.minCommitmentAge"), 1);
}

#[tokio::test]
async fn test_registrar_shares_handles_with_its_cache() {
    let ens = FakeEns::deployed();
    let registrar = build_registrar(&ens, &FakeChain::mainnet(), None);

    let handles = registrar.resolve_handles("eth").await;
    let cached = registrar.cache().controller("eth").await.unwrap();

    assert!(Arc::ptr_eq(handles.controller.as_ref().unwrap(), &cached));
}
