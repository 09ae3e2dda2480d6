use cuverie_storage::{
    AlarmStore, BusSettingsUpdate, InMemoryAlarmStore, InMemorySettingsStore, InMemoryTankStore,
    SettingsStore, SettingsUpdate, TankStore, UserPreferencesUpdate,
};
use domain::{
    Alarm, AlarmSeverity, AlarmThresholds, BusSettings, Settings, Tank, TankSlot, UserPreferences,
};

fn tank(index: u32) -> Tank {
    let slot = TankSlot {
        id: format!("tank-{index:02}"),
        index,
        display_name: format!("Cuve {index}"),
        order: 0,
    };
    Tank::from_slot("default", &slot, 1_000)
}

fn settings() -> Settings {
    Settings {
        alarm_thresholds: AlarmThresholds {
            high: 26.0,
            low: 16.0,
        },
        preferences: UserPreferences {
            locale: "fr-FR".to_string(),
            temperature_unit: "C".to_string(),
            theme: "auto".to_string(),
        },
        bus: BusSettings {
            url: None,
            username: None,
            password: None,
            reconnect_seconds: 2,
            mock_enabled: true,
        },
    }
}

#[tokio::test]
async fn tank_update_is_atomic_read_modify_write() {
    let store = InMemoryTankStore::new();
    store.upsert(tank(101)).await.expect("upsert");

    let updated = store
        .update(
            101,
            Box::new(|tank| {
                tank.temperature = Some(18.4);
                tank.last_updated_at_ms = 2_000;
            }),
        )
        .await
        .expect("update")
        .expect("tank present");
    assert_eq!(updated.temperature, Some(18.4));
    assert_eq!(updated.last_updated_at_ms, 2_000);

    let reread = store.get(101).await.expect("get").expect("tank present");
    assert_eq!(reread.temperature, Some(18.4));
}

#[tokio::test]
async fn tank_update_unknown_index_returns_none() {
    let store = InMemoryTankStore::new();
    let result = store
        .update(999, Box::new(|tank| tank.is_running = true))
        .await
        .expect("update");
    assert!(result.is_none());
}

#[tokio::test]
async fn tank_list_is_sorted_by_index() {
    let store = InMemoryTankStore::new();
    store.upsert(tank(103)).await.expect("upsert");
    store.upsert(tank(101)).await.expect("upsert");
    store.upsert(tank(102)).await.expect("upsert");
    let indices: Vec<u32> = store
        .list()
        .await
        .expect("list")
        .iter()
        .map(|tank| tank.index)
        .collect();
    assert_eq!(indices, vec![101, 102, 103]);
}

#[tokio::test]
async fn settings_update_merges_per_sub_object() {
    let store = InMemorySettingsStore::new(settings());
    let updated = store
        .update(SettingsUpdate {
            preferences: Some(UserPreferencesUpdate {
                theme: Some("dark".to_string()),
                ..Default::default()
            }),
            bus: Some(BusSettingsUpdate {
                url: Some("mqtt://broker:1883".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
        .expect("update");

    // 被更新的字段
    assert_eq!(updated.preferences.theme, "dark");
    assert_eq!(updated.bus.url.as_deref(), Some("mqtt://broker:1883"));
    // 未触及的字段保持原值
    assert_eq!(updated.preferences.locale, "fr-FR");
    assert_eq!(updated.alarm_thresholds.high, 26.0);
    assert!(updated.bus.mock_enabled);
}

#[tokio::test]
async fn alarm_acknowledge_is_one_way() {
    let store = InMemoryAlarmStore::new();
    store
        .add(Alarm {
            id: "alarm-1".to_string(),
            tank_index: 103,
            severity: AlarmSeverity::Critical,
            message: "High temperature".to_string(),
            triggered_at_ms: 0,
            acknowledged: false,
        })
        .await
        .expect("add");

    let acked = store
        .acknowledge("alarm-1")
        .await
        .expect("ack")
        .expect("alarm present");
    assert!(acked.acknowledged);

    // 二次确认仍为 true
    let again = store
        .acknowledge("alarm-1")
        .await
        .expect("ack")
        .expect("alarm present");
    assert!(again.acknowledged);

    assert!(store.acknowledge("missing").await.expect("ack").is_none());
}
