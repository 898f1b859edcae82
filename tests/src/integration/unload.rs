//! Unload-side properties: reference gating, cascades, ordering.

#![cfg(test)]

use crate::helpers::{drops, logged_service, new_drop_log, pinned_service, quick_host, service};
use plugboard_types::UnloadResult;
use std::thread;
use std::time::Duration;

fn result_of(report: &[plugboard_bus::UnloadEntry], name: &str) -> UnloadResult {
    report
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.result)
        .unwrap_or_else(|| panic!("no result recorded for {name}"))
}

#[test]
fn load_release_unload_round_trip() {
    let host = quick_host();
    assert!(host.load_components(vec![service("app/tool", &[])]));

    let handle = host.acquire("app/tool").unwrap();
    drop(handle);

    let report = host.unload_components(&["app/tool"], false);
    assert_eq!(result_of(&report, "app/tool"), UnloadResult::Success);
    assert!(host.get("app/tool").is_none());
}

#[test]
fn every_acquire_needs_a_matching_release() {
    let host = quick_host();
    assert!(host.load_components(vec![service("app/counted", &[])]));

    let first = host.acquire("app/counted").unwrap();
    let second = host.acquire("app/counted").unwrap();
    let third = host.acquire("app/counted").unwrap();

    drop(first);
    drop(third);

    // One handle still alive: bounded wait expires.
    let report = host.unload_components(&["app/counted"], false);
    assert_eq!(
        result_of(&report, "app/counted"),
        UnloadResult::ReferenceStillHeld
    );
    assert!(host.get("app/counted").is_some());

    drop(second);
    let report = host.unload_components(&["app/counted"], false);
    assert_eq!(result_of(&report, "app/counted"), UnloadResult::Success);
}

#[test]
fn release_from_another_thread_unblocks_the_wait() {
    // Generous wait: the releasing thread must win even on a slow machine.
    let host = plugboard_host::ComponentHost::bootstrap(
        plugboard_host::HostConfig::default().with_unload_wait(Duration::from_secs(5)),
    )
    .unwrap();
    assert!(host.load_components(vec![service("app/shared", &[])]));
    let handle = host.acquire("app/shared").unwrap();

    thread::scope(|scope| {
        scope.spawn(move || {
            thread::sleep(Duration::from_millis(5));
            drop(handle);
        });

        let report = host.unload_components(&["app/shared"], false);
        assert_eq!(result_of(&report, "app/shared"), UnloadResult::Success);
    });
}

#[test]
fn dependent_blocks_unload_without_cascade() {
    let host = quick_host();
    assert!(host.load_components(vec![
        service("app/base", &[]),
        service("app/user", &["app/base"]),
    ]));

    let report = host.unload_components(&["app/base"], false);
    assert_eq!(
        result_of(&report, "app/base"),
        UnloadResult::HasDependentComponent
    );
    assert!(host.get("app/base").is_some());
    assert!(host.get("app/user").is_some());
}

#[test]
fn cascade_destroys_in_reverse_dependency_order() {
    let host = quick_host();
    let log = new_drop_log();
    assert!(host.load_components(vec![
        logged_service("app/a", &[], &log),
        logged_service("app/b", &["app/a"], &log),
        logged_service("app/c", &["app/b"], &log),
    ]));

    let report = host.unload_components(&["app/a"], true);
    for name in ["app/a", "app/b", "app/c"] {
        assert_eq!(result_of(&report, name), UnloadResult::Success);
    }
    assert_eq!(drops(&log), vec!["app/c", "app/b", "app/a"]);
}

#[test]
fn non_unloadable_dependent_protects_its_dependency() {
    let host = quick_host();
    assert!(host.load_components(vec![
        service("app/base", &[]),
        pinned_service("app/resident", &["app/base"]),
    ]));

    let report = host.unload_components(&["app/base"], true);
    assert_eq!(
        result_of(&report, "app/resident"),
        UnloadResult::IsNotUnloadable
    );
    assert_eq!(
        result_of(&report, "app/base"),
        UnloadResult::HasDependentComponent
    );
    assert!(host.get("app/base").is_some());
    assert!(host.get("app/resident").is_some());
}

#[test]
fn unknown_names_report_immediately() {
    let host = quick_host();
    assert!(host.load_components(vec![service("app/real", &[])]));

    let report = host.unload_components(&["app/phantom", "app/real"], false);
    assert_eq!(
        result_of(&report, "app/phantom"),
        UnloadResult::NameNotFound
    );
    assert_eq!(result_of(&report, "app/real"), UnloadResult::Success);
}

#[test]
fn get_returns_null_after_unload() {
    let host = quick_host();
    assert!(host.load_components(vec![service("app/gone", &[])]));
    assert!(host.get("app/gone").is_some());

    host.unload_components(&["app/gone"], false);
    assert!(host.get("app/gone").is_none());

    // And the name is free for a fresh registration.
    assert!(host.load_components(vec![service("app/gone", &[])]));
    assert!(host.get("app/gone").is_some());
}

#[test]
fn constructor_time_dependencies_release_on_unload() {
    let host = quick_host();
    assert!(host.load_components(vec![
        service("app/dep", &[]),
        service("app/holder", &["app/dep"]),
    ]));

    // The holder's pinned reference would time out a direct unload of the
    // dependency; unloading the holder first releases it.
    let report = host.unload_components(&["app/holder"], false);
    assert_eq!(result_of(&report, "app/holder"), UnloadResult::Success);

    let report = host.unload_components(&["app/dep"], false);
    assert_eq!(result_of(&report, "app/dep"), UnloadResult::Success);
}
