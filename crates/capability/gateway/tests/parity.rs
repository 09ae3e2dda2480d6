//! 模式一致性：Mock 与 Live 共用同一条遥测应用路径，
//! 订阅方在两种模式下收到的事件形态一致，仅 source 标记不同。

use cuverie_gateway::{Gateway, GatewayConfig, TankUpdate};
use cuverie_storage::{
    InMemoryEventLogStore, InMemoryFacilityStore, InMemoryHistoryStore, InMemoryModeStore,
    InMemoryTankStore,
};
use domain::{FacilityConfig, TankSlot, TelemetrySource};
use std::sync::Arc;
use std::time::Duration;

fn fixture(mock_interval: Duration) -> Gateway {
    Gateway::new(
        GatewayConfig {
            mqtt_url: None,
            mqtt_username: None,
            mqtt_password: None,
            reconnect: Duration::from_secs(2),
            force_mock: true,
            mock_interval,
            offline_timeout: Duration::from_secs(60),
            offline_sweep: Duration::from_secs(10),
        },
        Arc::new(InMemoryTankStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(InMemoryFacilityStore::new()),
        Arc::new(InMemoryModeStore::new()),
        Arc::new(InMemoryEventLogStore::new()),
    )
}

fn snapshot() -> Vec<FacilityConfig> {
    vec![FacilityConfig {
        id: "default".to_string(),
        name: "Default".to_string(),
        tanks: vec![
            TankSlot {
                id: "tank-01".to_string(),
                index: 101,
                display_name: "Cuve 01".to_string(),
                order: 0,
            },
            TankSlot {
                id: "tank-02".to_string(),
                index: 102,
                display_name: "Cuve 02".to_string(),
                order: 1,
            },
        ],
    }]
}

#[tokio::test]
async fn mock_generator_emits_tagged_wellformed_events() {
    let gateway = fixture(Duration::from_millis(10));
    gateway
        .reconcile_snapshot(&snapshot())
        .await
        .expect("reconcile");

    let mut telemetry = gateway.on_telemetry();
    gateway.start().await;

    let event = tokio::time::timeout(Duration::from_secs(2), telemetry.recv())
        .await
        .expect("generator tick within timeout")
        .expect("event");
    assert_eq!(event.source, TelemetrySource::Mock);
    assert!(matches!(event.tank.index, 101 | 102));
    let value = event.tank.temperature.expect("temperature present");
    assert!((19.0..=26.0).contains(&value));
    assert!(!event.tank.history.is_empty());

    gateway.stop().await;
}

#[tokio::test]
async fn bus_path_emits_the_same_event_shape() {
    let gateway = fixture(Duration::from_secs(3600));
    gateway
        .reconcile_snapshot(&snapshot())
        .await
        .expect("reconcile");

    let mut telemetry = gateway.on_telemetry();
    let update = TankUpdate {
        temperature: Some(18.4),
        ..TankUpdate::default()
    };
    gateway
        .apply_telemetry(101, update, TelemetrySource::Bus)
        .await
        .expect("apply");

    let event = telemetry.try_recv().expect("event");
    assert_eq!(event.source, TelemetrySource::Bus);
    assert_eq!(event.tank.index, 101);
    assert_eq!(event.tank.temperature, Some(18.4));
}

#[tokio::test]
async fn stopped_generator_emits_nothing() {
    let gateway = fixture(Duration::from_millis(10));
    gateway
        .reconcile_snapshot(&snapshot())
        .await
        .expect("reconcile");

    gateway.start().await;
    gateway.stop().await;
    let mut telemetry = gateway.on_telemetry();

    // 停止后不应再有任何 tick 到达
    let result =
        tokio::time::timeout(Duration::from_millis(100), telemetry.recv()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn config_event_carries_enriched_facilities() {
    let gateway = fixture(Duration::from_secs(3600));
    let mut config = gateway.on_config();
    gateway
        .reconcile_snapshot(&snapshot())
        .await
        .expect("reconcile");

    let event = config.try_recv().expect("config event");
    assert_eq!(event.facilities.len(), 1);
    let facility = &event.facilities[0];
    assert_eq!(facility.config.id, "default");
    assert_eq!(facility.mode, domain::GeneralMode::Stop);
    assert_eq!(facility.config.tanks.len(), 2);
}
