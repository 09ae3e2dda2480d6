use cuverie_gateway::{Gateway, GatewayConfig, is_stale};
use cuverie_storage::{
    InMemoryEventLogStore, InMemoryFacilityStore, InMemoryHistoryStore, InMemoryModeStore,
    InMemoryTankStore, TankStore,
};
use domain::{FacilityConfig, TankSlot, TankStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn fixture(timeout: Duration) -> (Gateway, Arc<InMemoryTankStore>) {
    let tanks = Arc::new(InMemoryTankStore::new());
    let gateway = Gateway::new(
        GatewayConfig {
            mqtt_url: None,
            mqtt_username: None,
            mqtt_password: None,
            reconnect: Duration::from_secs(2),
            force_mock: true,
            mock_interval: Duration::from_millis(20),
            offline_timeout: timeout,
            offline_sweep: Duration::from_secs(10),
        },
        tanks.clone(),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(InMemoryFacilityStore::new()),
        Arc::new(InMemoryModeStore::new()),
        Arc::new(InMemoryEventLogStore::new()),
    );
    (gateway, tanks)
}

fn snapshot(indices: &[u32]) -> Vec<FacilityConfig> {
    vec![FacilityConfig {
        id: "default".to_string(),
        name: "Default".to_string(),
        tanks: indices
            .iter()
            .map(|&index| TankSlot {
                id: format!("tank-{index:02}"),
                index,
                display_name: format!("Cuve {index}"),
                order: index,
            })
            .collect(),
    }]
}

#[test]
fn staleness_rule() {
    let now = Instant::now();
    let timeout = Duration::from_secs(60);
    // 从未有心跳 → 失活
    assert!(is_stale(None, now, timeout));
    // 新鲜心跳 → 存活
    assert!(!is_stale(Some(now), now, timeout));
    // 超时窗口之外 → 失活
    let old = now.checked_sub(Duration::from_secs(61)).expect("instant");
    assert!(is_stale(Some(old), now, timeout));
}

#[tokio::test]
async fn sweep_marks_heartbeatless_tanks_offline_exactly_once() {
    let (gateway, tanks) = fixture(Duration::from_secs(60));
    gateway
        .reconcile_snapshot(&snapshot(&[1, 2]))
        .await
        .expect("reconcile");

    // 首轮：两罐都没有任何心跳 → 各标记一次
    let marked = gateway.sweep_offline_once().await.expect("sweep");
    assert_eq!(marked, 2);
    assert_eq!(
        tanks.get(1).await.expect("get").expect("tank").status,
        TankStatus::Offline
    );

    // 次轮：已经 offline，不再重复标记
    let marked = gateway.sweep_offline_once().await.expect("sweep");
    assert_eq!(marked, 0);
}

#[tokio::test]
async fn fresh_heartbeat_keeps_tank_online() {
    let (gateway, tanks) = fixture(Duration::from_secs(60));
    gateway
        .reconcile_snapshot(&snapshot(&[1, 2]))
        .await
        .expect("reconcile");

    gateway.touch_heartbeat(1);
    let marked = gateway.sweep_offline_once().await.expect("sweep");
    assert_eq!(marked, 1);
    assert_eq!(
        tanks.get(1).await.expect("get").expect("tank").status,
        TankStatus::Idle
    );
    assert_eq!(
        tanks.get(2).await.expect("get").expect("tank").status,
        TankStatus::Offline
    );
}

#[tokio::test]
async fn sweep_skips_soft_deleted_tanks() {
    let (gateway, tanks) = fixture(Duration::from_secs(60));
    gateway
        .reconcile_snapshot(&snapshot(&[1, 2]))
        .await
        .expect("reconcile");
    // 2 号罐被后续快照丢弃 → 软删除
    gateway
        .reconcile_snapshot(&snapshot(&[1]))
        .await
        .expect("reconcile");

    let marked = gateway.sweep_offline_once().await.expect("sweep");
    assert_eq!(marked, 1);
    let deleted = tanks.get(2).await.expect("get").expect("tank");
    assert!(deleted.is_deleted);
    // 软删除时已是 offline，巡检未再触碰它
    assert_eq!(deleted.status, TankStatus::Offline);
}
