//! Lifecycle event contracts: everything the host publishes on the bus.

#![cfg(test)]

use crate::helpers::{quick_host, service};
use plugboard_bus::{EventBus, EventFilter, EventTopic, HostEvent, Subscription};
use plugboard_host::ComponentHost;
use plugboard_log::LogRelay;
use plugboard_types::{Component, LoadResult, UnloadResult, EVENT_BUS, LOG_RELAY};
use std::sync::Arc;

fn lifecycle_subscription(host: &ComponentHost) -> (Arc<dyn Component>, Subscription) {
    let bus = host.get(EVENT_BUS).expect("bus loaded");
    let sub = bus
        .as_any()
        .downcast_ref::<EventBus>()
        .expect("bus type")
        .subscribe(EventFilter::topics(vec![EventTopic::Lifecycle]));
    (bus, sub)
}

fn next(sub: &mut Subscription) -> HostEvent {
    sub.try_recv()
        .expect("bus alive")
        .expect("an event should be buffered")
}

#[test]
fn load_emits_begin_and_complete_with_results() {
    let host = quick_host();
    let (_bus, mut sub) = lifecycle_subscription(&host);

    host.load_components(vec![
        service("app/ok", &[]),
        service("app/bad", &["app/absent"]),
    ]);

    let begin_id = match next(&mut sub) {
        HostEvent::LoadBegin {
            batch_id,
            names,
            count,
        } => {
            assert_eq!(names, vec!["app/ok".to_string(), "app/bad".to_string()]);
            assert_eq!(count, 2);
            batch_id
        }
        other => panic!("expected LoadBegin, got {other:?}"),
    };

    match next(&mut sub) {
        HostEvent::LoadComplete {
            batch_id,
            results,
            count,
        } => {
            assert_eq!(batch_id, begin_id);
            assert_eq!(count, 2);
            assert_eq!(results[0].name, "app/ok");
            assert_eq!(results[0].result, LoadResult::Success);
            assert_eq!(results[1].name, "app/bad");
            assert_eq!(results[1].result, LoadResult::DependencyNotFound);
        }
        other => panic!("expected LoadComplete, got {other:?}"),
    }
}

#[test]
fn unload_emits_begin_and_complete_with_results() {
    let host = quick_host();
    assert!(host.load_components(vec![service("app/temp", &[])]));

    let (_bus, mut sub) = lifecycle_subscription(&host);
    host.unload_components(&["app/temp", "app/phantom"], true);

    match next(&mut sub) {
        HostEvent::UnloadBegin {
            names,
            count,
            unload_deps,
        } => {
            assert_eq!(names, vec!["app/temp".to_string(), "app/phantom".to_string()]);
            assert_eq!(count, 2);
            assert!(unload_deps);
        }
        other => panic!("expected UnloadBegin, got {other:?}"),
    }

    match next(&mut sub) {
        HostEvent::UnloadComplete { results, count } => {
            assert_eq!(count, results.len());
            let phantom = results
                .iter()
                .find(|entry| entry.name == "app/phantom")
                .unwrap();
            assert_eq!(phantom.result, UnloadResult::NameNotFound);
            let temp = results.iter().find(|entry| entry.name == "app/temp").unwrap();
            assert_eq!(temp.result, UnloadResult::Success);
        }
        other => panic!("expected UnloadComplete, got {other:?}"),
    }
}

#[test]
fn relayed_logs_ride_the_same_bus() {
    let host = quick_host();
    let bus = host.get(EVENT_BUS).unwrap();
    let mut sub = bus
        .as_any()
        .downcast_ref::<EventBus>()
        .unwrap()
        .subscribe(EventFilter::topics(vec![EventTopic::Log]));

    let relay = host.acquire(LOG_RELAY).unwrap();
    relay
        .downcast_ref::<LogRelay>()
        .unwrap()
        .warn("tests/events", "relayed through the bus");

    match sub.try_recv().unwrap() {
        Some(HostEvent::Log(record)) => {
            assert_eq!(record.source, "tests/events");
            assert_eq!(record.severity, "warn");
            assert_eq!(record.message, "relayed through the bus");
        }
        other => panic!("expected a log record, got {other:?}"),
    }
}

#[tokio::test]
async fn async_subscribers_see_lifecycle_events() {
    let host = quick_host();
    let (_bus, mut sub) = lifecycle_subscription(&host);

    host.load_components(vec![service("app/async", &[])]);

    match sub.recv().await {
        Some(HostEvent::LoadBegin { names, .. }) => {
            assert_eq!(names, vec!["app/async".to_string()]);
        }
        other => panic!("expected LoadBegin, got {other:?}"),
    }
}
