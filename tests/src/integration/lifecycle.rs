//! Load-side properties of the component host.

#![cfg(test)]

use crate::helpers::{pinned_service, quick_host, service};
use plugboard_types::{EVENT_BUS, LOG_RELAY};
use std::sync::Arc;

#[test]
fn acyclic_batch_loads_every_component() {
    let host = quick_host();
    let loaded = host.load_components(vec![
        service("app/config", &[]),
        service("app/store", &["app/config"]),
        service("app/api", &["app/store", "app/config"]),
    ]);

    assert!(loaded);
    for name in ["app/config", "app/store", "app/api"] {
        assert!(host.get(name).is_some(), "{name} should resolve");
    }
}

#[test]
fn submission_order_does_not_matter() {
    let host = quick_host();
    // Deepest dependency listed last; construction order is discovered.
    let loaded = host.load_components(vec![
        service("app/api", &["app/store"]),
        service("app/store", &["app/config"]),
        service("app/config", &[]),
    ]);

    assert!(loaded);
    assert!(host.get("app/api").is_some());
}

#[test]
fn direct_cycle_loads_neither_side() {
    let host = quick_host();
    let loaded = host.load_components(vec![
        service("app/ping", &["app/pong"]),
        service("app/pong", &["app/ping"]),
    ]);

    assert!(!loaded);
    assert!(host.get("app/ping").is_none());
    assert!(host.get("app/pong").is_none());
}

#[test]
fn missing_dependency_spares_unrelated_siblings() {
    let host = quick_host();
    let loaded = host.load_components(vec![
        service("app/broken", &["app/absent"]),
        service("app/healthy", &[]),
    ]);

    assert!(!loaded);
    assert!(host.get("app/broken").is_none());
    assert!(host.get("app/healthy").is_some());
}

#[test]
fn duplicate_of_loaded_component_is_rejected() {
    let host = quick_host();
    assert!(host.load_components(vec![service("app/unique", &[])]));
    let original = host.get("app/unique").unwrap();

    assert!(!host.load_components(vec![service("app/unique", &[])]));
    assert!(Arc::ptr_eq(&original, &host.get("app/unique").unwrap()));
}

#[test]
fn duplicate_within_one_batch_is_rejected() {
    let host = quick_host();
    let loaded = host.load_components(vec![
        service("app/twice", &[]),
        service("app/twice", &[]),
    ]);

    assert!(!loaded);
    // The first entry won; the component itself is registered.
    assert!(host.get("app/twice").is_some());
}

#[test]
fn later_batch_can_depend_on_core_components() {
    let host = quick_host();
    let loaded = host.load_components(vec![
        service("app/audited", &[LOG_RELAY]),
        pinned_service("app/watchdog", &[EVENT_BUS]),
    ]);

    assert!(loaded);
    assert!(host.get("app/audited").is_some());
    assert!(host.get("app/watchdog").is_some());
}

#[test]
fn sequential_batches_share_one_registry() {
    let host = quick_host();
    assert!(host.load_components(vec![service("app/first", &[])]));
    assert!(host.load_components(vec![service("app/second", &["app/first"])]));
    assert!(host.get("app/second").is_some());
}
