//! Integration tests driving the listener service and event channel together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use notify_relay_channel::mock::RecordingSink;
use notify_relay_channel::{sink_fn, DispatchOutcome, SinkError, SubscriberRegistry};
use notify_relay_listener::{
    build_bridge, Config, LifecycleEvent, ListenerService, ServiceState,
};
use notify_relay_types::{
    EventRecord, ExtraValue, RawNotification, Record, EXTRA_TEXT, EXTRA_TITLE,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("notify_relay=debug"))
        .with_test_writer()
        .try_init();
}

fn notification(package: &str, title: &str, text: &str, post_time: i64) -> RawNotification {
    RawNotification::new(package, post_time)
        .with_extra(EXTRA_TITLE, ExtraValue::String(title.to_string()))
        .with_extra(EXTRA_TEXT, ExtraValue::String(text.to_string()))
}

#[tokio::test]
async fn posted_notification_reaches_stream_exactly_once() {
    init_tracing();
    let mut bridge = build_bridge(&Config::default());
    let mut stream = bridge.channel.start_listening();

    bridge.service.on_listener_connected();
    bridge
        .service
        .on_notification_posted(Some(notification("com.a", "T", "B", 1000)));
    bridge.channel.stop_listening();

    let record = stream.recv().await.expect("one record");
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({"packageName": "com.a", "title": "T", "text": "B", "timestamp": 1000})
    );
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn full_binding_lifecycle_over_channel() {
    init_tracing();
    let mut bridge = build_bridge(&Config::default());
    let mut stream = bridge.channel.start_listening();

    let events = vec![
        LifecycleEvent::ListenerConnected,
        LifecycleEvent::NotificationPosted(Some(notification("com.a", "one", "1", 1))),
        LifecycleEvent::NotificationRemoved(Some(notification("com.a", "one", "1", 1))),
        LifecycleEvent::NotificationPosted(Some(notification("com.b", "two", "2", 2))),
        LifecycleEvent::ListenerDisconnected,
        LifecycleEvent::NotificationPosted(Some(notification("com.c", "late", "3", 3))),
        LifecycleEvent::ListenerDisconnected,
    ];
    for event in events {
        bridge.service.handle(event);
    }
    assert_eq!(bridge.service.state(), ServiceState::Disconnected);

    let mut received = Vec::new();
    while let Some(record) = stream.try_recv() {
        received.push(record);
    }
    assert_eq!(received.len(), 3);
    assert_eq!(received[0].as_event().unwrap().source_id(), "com.a");
    assert_eq!(received[1].as_event().unwrap().source_id(), "com.b");
    assert!(received[2].is_terminal());

    let stats = bridge.service.stats();
    assert_eq!(stats.posted, 2);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.terminal, 1);
}

#[test]
fn events_between_detach_and_attach_are_lost() {
    init_tracing();
    let registry = Arc::new(SubscriberRegistry::new());
    let mut service = ListenerService::new(Arc::clone(&registry));
    service.on_listener_connected();

    let first = RecordingSink::new();
    let first_handle = first.handle();
    registry.attach(Arc::new(first));
    service.on_notification_posted(Some(notification("com.a", "a", "a", 1)));
    registry.detach();
    service.on_notification_posted(Some(notification("com.a", "b", "b", 2)));

    let second = RecordingSink::new();
    let second_handle = second.handle();
    registry.attach(Arc::new(second));
    service.on_notification_posted(Some(notification("com.a", "c", "c", 3)));

    assert_eq!(first_handle.events().len(), 1);
    assert_eq!(second_handle.events().len(), 1);
    assert_eq!(second_handle.events()[0].timestamp(), 3);
    assert_eq!(service.stats().dropped, 1);
}

#[test]
fn consumer_failure_does_not_stop_later_deliveries() {
    init_tracing();
    let registry = Arc::new(SubscriberRegistry::new());
    let mut service = ListenerService::new(Arc::clone(&registry));
    service.on_listener_connected();

    registry.attach(sink_fn(|record: Record| {
        if record.as_event().is_some_and(|e| e.timestamp() == 1) {
            return Err(SinkError::Rejected("bad record".to_string()));
        }
        Ok(())
    }));

    service.on_notification_posted(Some(notification("com.a", "x", "x", 1)));
    service.on_notification_posted(Some(notification("com.a", "y", "y", 2)));

    let stats = service.stats();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.delivered, 1);
    assert_eq!(service.state(), ServiceState::Connected);
}

/// Dispatch runs on its own thread, as host callbacks do, while the main
/// thread repeatedly attaches and detaches. Once `detach` returns, the
/// detached sink must never see another record.
#[test]
fn no_delivery_after_detach_under_concurrency() {
    init_tracing();
    let registry = Arc::new(SubscriberRegistry::new());
    let stop = Arc::new(AtomicBool::new(false));

    let dispatcher = {
        let registry = Arc::clone(&registry);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut n = 0_i64;
            while !stop.load(Ordering::SeqCst) {
                let _ = registry.dispatch(EventRecord::new("com.load", None, None, n));
                n += 1;
            }
        })
    };

    for _ in 0..200 {
        let sink = RecordingSink::new();
        let handle = sink.handle();
        registry.attach(Arc::new(sink));
        thread::yield_now();
        registry.detach();

        let seen_at_detach = handle.len();
        thread::sleep(Duration::from_micros(50));
        assert_eq!(handle.len(), seen_at_detach, "record delivered after detach");
    }

    stop.store(true, Ordering::SeqCst);
    dispatcher.join().unwrap();
}

#[test]
fn callbacks_on_host_thread_reach_consumer_thread() {
    init_tracing();
    let bridge = build_bridge(&Config::default());
    let (tx, rx) = mpsc::channel::<Record>();
    bridge.channel.start_listening_with(sink_fn(move |record| {
        tx.send(record).map_err(|_| SinkError::Closed)
    }));

    let mut service = bridge.service;
    let host = thread::spawn(move || {
        service.on_listener_connected();
        for i in 0..10 {
            service.on_notification_posted(Some(notification("com.host", "t", "b", i)));
        }
        service.on_listener_disconnected();
        service.stats()
    });

    let stats = host.join().unwrap();
    assert_eq!(stats.delivered, 10);

    let received: Vec<Record> = rx.try_iter().collect();
    assert_eq!(received.len(), 11);
    let timestamps: Vec<i64> = received
        .iter()
        .filter_map(Record::as_event)
        .map(EventRecord::timestamp)
        .collect();
    assert_eq!(timestamps, (0..10).collect::<Vec<_>>());
    assert!(received[10].is_terminal());
}

#[test]
fn dispatch_with_nothing_attached_never_fails() {
    init_tracing();
    let registry = SubscriberRegistry::new();
    for n in 0..3 {
        assert_eq!(
            registry.dispatch(EventRecord::new("com.a", None, None, n)),
            DispatchOutcome::Dropped
        );
    }
    registry.detach();
    assert!(!registry.is_attached());
}
