use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use crate::params::{FileParamStore, ParamStore};
use crate::transport::{LocalBus, Point32, PointCloud, StreamMessage};
use crate::world::World;
use crate::world::driver::run_until;

#[test]
fn integration_file_store_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("params.json");
    let store = Arc::new(FileParamStore::new(&path));
    let bus = Arc::new(LocalBus::new());
    let world = World::new("World", "/ambf/env", store.clone(), bus.clone());
    let renderer = world.reconciler();

    // no file yet: cycle skipped, nothing live
    let report = world.update_params_from_server();
    assert!(!report.changed());
    assert_eq!(report.diagnostics.len(), 1);

    store.set_string_param(world.params_key(), &[]).unwrap();
    world.append_point_cloud_topic("/ambf/env/pc/lidar").unwrap();
    world.append_point_cloud_topic("/ambf/env/pc/depth").unwrap();
    world.update_params_from_server();
    assert_eq!(
        world.new_topic_names(),
        vec!["/ambf/env/pc/lidar".to_string(), "/ambf/env/pc/depth".to_string()]
    );

    let cloud = PointCloud::new(
        "lidar",
        vec![
            Point32 {
                x: 0.0,
                y: 1.0,
                z: 2.0,
            };
            32
        ],
    );
    bus.publish("/ambf/env/pc/lidar", StreamMessage::PointCloud(cloud));
    bus.publish("/ambf/env/pc/lidar/radius", StreamMessage::Radius { data: -0.25 });

    let sample = renderer.latest_sample("/ambf/env/pc/lidar").unwrap();
    assert_eq!(sample.len(), 32);
    assert_eq!(renderer.radius("/ambf/env/pc/lidar"), Some(0.25));
    assert!(renderer.latest_sample("/ambf/env/pc/depth").is_none());

    // an external edit drops lidar
    fs::write(
        &path,
        r#"{"/ambf/env/World/point_cloud_topics": ["/ambf/env/pc/depth"]}"#,
    )
    .unwrap();
    world.update_params_from_server();
    assert_eq!(world.defunct_topic_names(), vec!["/ambf/env/pc/lidar".to_string()]);
    assert!(renderer.latest_sample("/ambf/env/pc/lidar").is_none());
    assert_eq!(bus.subscriber_count("/ambf/env/pc/lidar"), 0);
    assert_eq!(bus.subscription_count(), 3);

    world.shutdown();
    assert_eq!(bus.subscription_count(), 0);
}

#[tokio::test]
async fn integration_driver_follows_file_edits() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("params.json");
    let store = Arc::new(FileParamStore::new(&path));
    let bus = Arc::new(LocalBus::new());
    let world = World::new("World", "/ambf/env", store.clone(), bus.clone());
    store
        .set_string_param(world.params_key(), &["pc/a".to_string()])
        .unwrap();

    let edit_path = path.clone();
    let observer = world.reconciler();
    let shutdown = async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(
            &edit_path,
            r#"{"/ambf/env/World/point_cloud_topics": ["pc/a", "pc/b"]}"#,
        )
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            observer.active_topics(),
            vec!["pc/a".to_string(), "pc/b".to_string()]
        );
    };

    let reconciler = world.reconciler();
    let cycles = run_until(&world, 100.0, shutdown).await;

    assert!(cycles >= 2);
    // drained on shutdown
    assert_eq!(reconciler.handler_count(), 0);
    assert_eq!(bus.subscription_count(), 0);
}
