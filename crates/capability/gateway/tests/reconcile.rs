use cuverie_gateway::reconcile::reconcile;
use cuverie_storage::{
    FacilityStore, InMemoryFacilityStore, InMemoryModeStore, InMemoryTankStore, ModeStore,
    TankStore,
};
use domain::{FacilityConfig, GeneralMode, TankSlot, TankStatus};

fn slot(index: u32, name: &str) -> TankSlot {
    TankSlot {
        id: format!("tank-{index:02}"),
        index,
        display_name: name.to_string(),
        order: index,
    }
}

fn facility(id: &str, indices: &[u32]) -> FacilityConfig {
    FacilityConfig {
        id: id.to_string(),
        name: id.to_string(),
        tanks: indices
            .iter()
            .map(|&index| slot(index, &format!("Cuve {index}")))
            .collect(),
    }
}

struct Stores {
    tanks: InMemoryTankStore,
    facilities: InMemoryFacilityStore,
    modes: InMemoryModeStore,
}

fn stores() -> Stores {
    Stores {
        tanks: InMemoryTankStore::new(),
        facilities: InMemoryFacilityStore::new(),
        modes: InMemoryModeStore::new(),
    }
}

#[tokio::test]
async fn snapshot_creates_tanks_with_default_state() {
    let s = stores();
    let snapshot = vec![facility("default", &[101, 102, 103])];
    let outcome = reconcile(&s.tanks, &s.facilities, &s.modes, &snapshot, 1_000)
        .await
        .expect("reconcile");
    assert_eq!(outcome.created, 3);
    assert_eq!(outcome.soft_deleted, 0);

    let tank = s.tanks.get(101).await.expect("get").expect("tank");
    assert_eq!(tank.status, TankStatus::Idle);
    assert_eq!(tank.temperature, None);
    assert_eq!(tank.setpoint, None);
    assert!(!tank.is_deleted);
    assert_eq!(tank.facility_id.as_deref(), Some("default"));

    // 无模式记录的酒库初始化为 STOP
    assert_eq!(
        s.modes.get("default").await.expect("get"),
        Some(GeneralMode::Stop)
    );
}

#[tokio::test]
async fn reapplying_identical_snapshot_is_idempotent() {
    let s = stores();
    let snapshot = vec![facility("default", &[101, 102])];
    reconcile(&s.tanks, &s.facilities, &s.modes, &snapshot, 1_000)
        .await
        .expect("reconcile");
    let outcome = reconcile(&s.tanks, &s.facilities, &s.modes, &snapshot, 2_000)
        .await
        .expect("reconcile");
    assert_eq!(outcome.created, 0);
    assert_eq!(outcome.revived, 0);
    assert_eq!(outcome.soft_deleted, 0);
    assert_eq!(s.tanks.list().await.expect("list").len(), 2);
}

#[tokio::test]
async fn dropped_index_is_soft_deleted_and_revived() {
    let s = stores();
    let s1 = vec![facility("default", &[1, 2, 3])];
    let s2 = vec![facility("default", &[1, 3])];
    reconcile(&s.tanks, &s.facilities, &s.modes, &s1, 1_000)
        .await
        .expect("reconcile");

    let outcome = reconcile(&s.tanks, &s.facilities, &s.modes, &s2, 2_000)
        .await
        .expect("reconcile");
    assert_eq!(outcome.soft_deleted, 1);

    let dropped = s.tanks.get(2).await.expect("get").expect("tank");
    assert!(dropped.is_deleted);
    assert_eq!(dropped.status, TankStatus::Offline);
    // 其余储罐保持活跃
    assert!(!s.tanks.get(1).await.expect("get").expect("tank").is_deleted);
    assert!(!s.tanks.get(3).await.expect("get").expect("tank").is_deleted);

    // 重新应用 S1 复活 2 号罐
    let outcome = reconcile(&s.tanks, &s.facilities, &s.modes, &s1, 3_000)
        .await
        .expect("reconcile");
    assert_eq!(outcome.revived, 1);
    assert_eq!(outcome.created, 0);
    assert!(!s.tanks.get(2).await.expect("get").expect("tank").is_deleted);
}

#[tokio::test]
async fn vanished_facility_is_removed() {
    let s = stores();
    reconcile(
        &s.tanks,
        &s.facilities,
        &s.modes,
        &[facility("nord", &[1]), facility("sud", &[2])],
        1_000,
    )
    .await
    .expect("reconcile");

    let outcome = reconcile(
        &s.tanks,
        &s.facilities,
        &s.modes,
        &[facility("nord", &[1])],
        2_000,
    )
    .await
    .expect("reconcile");
    assert_eq!(outcome.removed_facilities, 1);
    assert!(s.facilities.get("sud").await.expect("get").is_none());
    // 储罐依旧可按 index 查询（从未被硬删除）
    assert!(s.tanks.get(2).await.expect("get").is_some());
}

#[tokio::test]
async fn empty_snapshot_clears_configuration() {
    let s = stores();
    reconcile(
        &s.tanks,
        &s.facilities,
        &s.modes,
        &[facility("default", &[101])],
        1_000,
    )
    .await
    .expect("reconcile");

    let outcome = reconcile(&s.tanks, &s.facilities, &s.modes, &[], 2_000)
        .await
        .expect("reconcile");
    assert_eq!(outcome.removed_facilities, 1);
    assert!(s.facilities.list().await.expect("list").is_empty());

    // 配置（而非遥测）决定可见性：配置为空时公开列表必须为空
    let configured = domain::configured_indices(&[]);
    let visible = s
        .tanks
        .list()
        .await
        .expect("list")
        .into_iter()
        .filter(|tank| tank.is_visible(&configured))
        .count();
    assert_eq!(visible, 0);
}

#[tokio::test]
async fn existing_mode_is_not_reset() {
    let s = stores();
    s.modes
        .set("default", GeneralMode::Heat)
        .await
        .expect("set");
    reconcile(
        &s.tanks,
        &s.facilities,
        &s.modes,
        &[facility("default", &[101])],
        1_000,
    )
    .await
    .expect("reconcile");
    assert_eq!(
        s.modes.get("default").await.expect("get"),
        Some(GeneralMode::Heat)
    );
}
