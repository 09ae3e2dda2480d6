//! 演示数据种子
//!
//! 在没有外部配置快照时提供一个可直接观察的最小车间：
//! 3 个储罐（index 101–103）、默认酒库、1 条未确认的高温告警。
//! Mock 生成器与前端演示都依赖这组数据。

use crate::error::StorageError;
use crate::models::HISTORY_CAP;
use crate::traits::{AlarmStore, FacilityStore, HistoryStore, ModeStore, TankStore};
use domain::{
    Alarm, AlarmSeverity, FacilityConfig, GeneralMode, Tank, TankContents, TankSlot, TankStatus,
    TemperatureSample,
};

struct SeedTank {
    index: u32,
    id: &'static str,
    name: &'static str,
    status: TankStatus,
    temperature: f64,
    setpoint: f64,
    capacity_liters: f64,
    fill_level_percent: f64,
    grape: &'static str,
    vintage: i32,
    volume_liters: f64,
    is_running: bool,
    alarms: &'static [&'static str],
}

const SEED_TANKS: &[SeedTank] = &[
    SeedTank {
        index: 101,
        id: "tank-01",
        name: "Cuve 01",
        status: TankStatus::Cooling,
        temperature: 18.4,
        setpoint: 18.0,
        capacity_liters: 5_000.0,
        fill_level_percent: 72.0,
        grape: "Chardonnay",
        vintage: 2024,
        volume_liters: 3_600.0,
        is_running: true,
        alarms: &[],
    },
    SeedTank {
        index: 102,
        id: "tank-02",
        name: "Cuve 02",
        status: TankStatus::Idle,
        temperature: 21.1,
        setpoint: 21.0,
        capacity_liters: 6_000.0,
        fill_level_percent: 55.0,
        grape: "Sauvignon",
        vintage: 2023,
        volume_liters: 3_300.0,
        is_running: false,
        alarms: &[],
    },
    SeedTank {
        index: 103,
        id: "tank-03",
        name: "Cuve 03",
        status: TankStatus::Alarm,
        temperature: 25.9,
        setpoint: 23.0,
        capacity_liters: 4_500.0,
        fill_level_percent: 91.0,
        grape: "Merlot",
        vintage: 2024,
        volume_liters: 4_095.0,
        is_running: true,
        alarms: &["High temperature"],
    },
];

/// 生成一段围绕基准温度的确定性历史（30 分钟间隔）。
fn demo_history(base: f64, now_ms: i64) -> Vec<TemperatureSample> {
    (0..HISTORY_CAP)
        .map(|i| {
            let jitter = ((i % 7) as f64 - 3.0) * 0.15;
            TemperatureSample {
                ts_ms: now_ms - ((HISTORY_CAP - 1 - i) as i64) * 30 * 60 * 1000,
                value: base + jitter,
            }
        })
        .collect()
}

/// 写入演示车间数据。幂等性不做保证，只应在空注册表上调用一次。
pub async fn seed_demo_fleet(
    tanks: &dyn TankStore,
    history: &dyn HistoryStore,
    facilities: &dyn FacilityStore,
    modes: &dyn ModeStore,
    alarms: &dyn AlarmStore,
    now_ms: i64,
) -> Result<(), StorageError> {
    for seed in SEED_TANKS {
        let samples = demo_history(seed.temperature, now_ms);
        for sample in &samples {
            history.append(seed.index, sample.clone()).await?;
        }
        tanks
            .upsert(Tank {
                index: seed.index,
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                status: seed.status,
                temperature: Some(seed.temperature),
                setpoint: Some(seed.setpoint),
                capacity_liters: seed.capacity_liters,
                fill_level_percent: seed.fill_level_percent,
                contents: Some(TankContents {
                    grape: seed.grape.to_string(),
                    vintage: Some(seed.vintage),
                    volume_liters: Some(seed.volume_liters),
                    notes: None,
                }),
                is_running: seed.is_running,
                last_updated_at_ms: now_ms,
                history: samples,
                alarms: seed.alarms.iter().map(|s| s.to_string()).collect(),
                facility_id: Some("default".to_string()),
                is_deleted: false,
            })
            .await?;
    }

    facilities
        .upsert(FacilityConfig {
            id: "default".to_string(),
            name: "Cuverie".to_string(),
            tanks: SEED_TANKS
                .iter()
                .enumerate()
                .map(|(order, seed)| TankSlot {
                    id: seed.id.to_string(),
                    index: seed.index,
                    display_name: seed.name.to_string(),
                    order: order as u32,
                })
                .collect(),
        })
        .await?;
    modes.set("default", GeneralMode::Stop).await?;

    alarms
        .add(Alarm {
            id: "alarm-001".to_string(),
            tank_index: 103,
            severity: AlarmSeverity::Critical,
            message: "Temperature above high threshold (+2.9°C)".to_string(),
            triggered_at_ms: now_ms - 1_800_000,
            acknowledged: false,
        })
        .await?;

    Ok(())
}
