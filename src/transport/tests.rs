use super::{Callback, LocalBus, Point32, PointCloud, StreamKind, StreamMessage, Transport};
use crate::utils::error::TransportError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting_callback() -> (Callback, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let callback: Callback = Arc::new(move |_msg: &StreamMessage| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (callback, hits)
}

#[test]
fn test_stream_topic_names() {
    assert_eq!(StreamKind::Data.topic_for("pc/a"), "pc/a");
    assert_eq!(StreamKind::Radius.topic_for("pc/a"), "pc/a/radius");
    assert_eq!(StreamKind::Color.topic_for("pc/a"), "pc/a/color");
}

#[test]
fn test_bus_subscribe_and_publish() {
    let bus = LocalBus::new();
    let (callback, hits) = counting_callback();
    bus.subscribe("pc/a", StreamKind::Data, callback).unwrap();

    let delivered = bus.publish("pc/a", StreamMessage::PointCloud(PointCloud::default()));
    assert_eq!(delivered, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(bus.subscriber_count("pc/a"), 1);
}

#[test]
fn test_bus_routes_by_kind() {
    let bus = LocalBus::new();
    let (callback, hits) = counting_callback();
    bus.subscribe("pc/a", StreamKind::Data, callback).unwrap();

    let delivered = bus.publish("pc/a", StreamMessage::Radius { data: 2.0 });
    assert_eq!(delivered, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_publish_to_topic_without_subscribers() {
    let bus = LocalBus::new();
    assert_eq!(bus.publish("nowhere", StreamMessage::Radius { data: 1.0 }), 0);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let bus = LocalBus::new();
    let (callback, hits) = counting_callback();
    let handle = bus.subscribe("pc/a", StreamKind::Data, callback).unwrap();

    bus.unsubscribe(handle).unwrap();
    bus.publish("pc/a", StreamMessage::PointCloud(PointCloud::default()));

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(bus.subscriber_count("pc/a"), 0);
    assert_eq!(bus.subscription_count(), 0);
}

#[test]
fn test_unsubscribe_unknown_handle_fails() {
    let bus = LocalBus::new();
    let (callback, _) = counting_callback();
    let handle = bus.subscribe("pc/a", StreamKind::Data, callback).unwrap();
    bus.unsubscribe(handle).unwrap();

    match bus.unsubscribe(handle) {
        Err(TransportError::UnknownSubscription(id)) => assert_eq!(id, handle.id()),
        other => panic!("expected UnknownSubscription, got {other:?}"),
    }
}

#[test]
fn test_closed_bus_rejects_subscribe() {
    let bus = LocalBus::new();
    bus.close();
    let (callback, _) = counting_callback();

    let result = bus.subscribe("pc/a", StreamKind::Data, callback);
    assert!(matches!(result, Err(TransportError::Closed)));
}

#[test]
fn test_stream_message_json_is_tagged() {
    let cloud = PointCloud::new(
        "world",
        vec![Point32 {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        }],
    );
    let json = serde_json::to_value(StreamMessage::PointCloud(cloud.clone())).unwrap();
    assert_eq!(json["type"], "point_cloud");
    assert_eq!(json["frame_id"], "world");

    let radius: StreamMessage = serde_json::from_str(r#"{"type":"radius","data":4.5}"#).unwrap();
    assert_eq!(radius, StreamMessage::Radius { data: 4.5 });
    assert_eq!(radius.kind(), StreamKind::Radius);
}
