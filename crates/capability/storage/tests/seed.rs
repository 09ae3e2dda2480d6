use cuverie_storage::{
    AlarmStore, FacilityStore, InMemoryAlarmStore, InMemoryFacilityStore, InMemoryHistoryStore,
    InMemoryModeStore, InMemoryTankStore, ModeStore, TankStore, seed_demo_fleet,
};
use domain::GeneralMode;

#[tokio::test]
async fn demo_seed_creates_default_fleet() {
    let tanks = InMemoryTankStore::new();
    let history = InMemoryHistoryStore::new();
    let facilities = InMemoryFacilityStore::new();
    let modes = InMemoryModeStore::new();
    let alarms = InMemoryAlarmStore::new();

    seed_demo_fleet(&tanks, &history, &facilities, &modes, &alarms, 1_000_000)
        .await
        .expect("seed");

    let all = tanks.list().await.expect("list");
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|tank| !tank.is_deleted));
    assert_eq!(all.first().expect("tank").index, 101);

    let facility = facilities
        .get("default")
        .await
        .expect("get")
        .expect("facility present");
    assert_eq!(facility.tanks.len(), 3);
    assert_eq!(
        modes.get("default").await.expect("get"),
        Some(GeneralMode::Stop)
    );
    assert_eq!(alarms.list().await.expect("list").len(), 1);
}
