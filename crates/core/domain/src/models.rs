//! 领域数据模型
//!
//! 定义监控域的全部实体：
//! - 储罐模型：Tank, TankContents, TemperatureSample
//! - 酒库配置模型：FacilityConfig, TankSlot, FacilityWithMode
//! - 告警模型：Alarm
//! - 审计事件模型：EventRecord
//! - 运行设置模型：Settings（阈值、偏好、总线连接）

use crate::{AlarmSeverity, EventCategory, EventSource, GeneralMode, TankStatus};
use std::collections::BTreeSet;

/// 温度历史采样点。
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSample {
    pub ts_ms: i64,
    pub value: f64,
}

/// 储罐内容物。
///
/// `grape` 为主描述符（总线只传输该字段），其余字段仅在本地保存，
/// 部分更新时原样保留。
#[derive(Debug, Clone, PartialEq)]
pub struct TankContents {
    pub grape: String,
    pub vintage: Option<i32>,
    pub volume_liters: Option<f64>,
    pub notes: Option<String>,
}

/// 储罐记录。
///
/// `index` 是配置分配的稳定数字标识，也是配置、遥测 topic 与命令之间的
/// 连接键，一经分配不可变。`id` 是展示用标识，可由 `(facility_id, index)`
/// 确定性派生。`temperature`/`setpoint` 为 None 表示从未观测到。
#[derive(Debug, Clone)]
pub struct Tank {
    pub index: u32,
    pub id: String,
    pub name: String,
    pub status: TankStatus,
    pub temperature: Option<f64>,
    pub setpoint: Option<f64>,
    pub capacity_liters: f64,
    pub fill_level_percent: f64,
    pub contents: Option<TankContents>,
    pub is_running: bool,
    pub last_updated_at_ms: i64,
    /// 最近 48 个采样点，旧在前。
    pub history: Vec<TemperatureSample>,
    /// 活动告警描述（遗留便捷字段，权威台账为 Alarm 实体）。
    pub alarms: Vec<String>,
    pub facility_id: Option<String>,
    /// 软删除标记：储罐一旦可能被历史引用就不再物理删除。
    pub is_deleted: bool,
}

impl Tank {
    /// 从配置槽位创建默认状态的储罐（仅对账引擎调用）。
    pub fn from_slot(facility_id: &str, slot: &TankSlot, now_ms: i64) -> Self {
        Self {
            index: slot.index,
            id: slot.id.clone(),
            name: slot.display_name.clone(),
            status: TankStatus::Idle,
            temperature: None,
            setpoint: None,
            capacity_liters: 0.0,
            fill_level_percent: 0.0,
            contents: None,
            is_running: false,
            last_updated_at_ms: now_ms,
            history: Vec::new(),
            alarms: Vec::new(),
            facility_id: Some(facility_id.to_string()),
            is_deleted: false,
        }
    }

    /// 对外可见性判定：未软删除且属于当前配置集合。
    ///
    /// 这是唯一的可见性规则，列表接口、推送初始化、Mock 生成器与
    /// 离线巡检都必须复用，避免两套过滤条件漂移。
    pub fn is_visible(&self, configured: &BTreeSet<u32>) -> bool {
        !self.is_deleted && configured.contains(&self.index)
    }
}

/// 酒库配置中的储罐槽位描述。
#[derive(Debug, Clone, PartialEq)]
pub struct TankSlot {
    pub id: String,
    pub index: u32,
    pub display_name: String,
    pub order: u32,
}

/// 酒库（cuverie）配置：当前归属的储罐槽位集合是"活跃储罐"的事实来源。
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityConfig {
    pub id: String,
    pub name: String,
    pub tanks: Vec<TankSlot>,
}

/// 附带总体模式的酒库配置（配置变更事件的载荷）。
#[derive(Debug, Clone)]
pub struct FacilityWithMode {
    pub config: FacilityConfig,
    pub mode: GeneralMode,
}

/// 当前配置集合中的全部储罐 index。
pub fn configured_indices(facilities: &[FacilityConfig]) -> BTreeSet<u32> {
    facilities
        .iter()
        .flat_map(|facility| facility.tanks.iter().map(|slot| slot.index))
        .collect()
}

/// 告警记录。`acknowledged` 只允许 false → true 单向迁移。
#[derive(Debug, Clone)]
pub struct Alarm {
    pub id: String,
    pub tank_index: u32,
    pub severity: AlarmSeverity,
    pub message: String,
    pub triggered_at_ms: i64,
    pub acknowledged: bool,
}

/// 审计事件记录（追加写）。
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub id: String,
    pub ts_ms: i64,
    pub tank_index: Option<u32>,
    pub category: EventCategory,
    pub source: EventSource,
    pub summary: String,
    pub details: Option<String>,
    /// 结构化元数据（JSON 格式）。
    pub metadata: Option<String>,
}

/// 告警阈值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmThresholds {
    pub high: f64,
    pub low: f64,
}

/// 用户展示偏好。
#[derive(Debug, Clone, PartialEq)]
pub struct UserPreferences {
    pub locale: String,
    /// 温度单位：C | F
    pub temperature_unit: String,
    /// 主题：light | dark | auto
    pub theme: String,
}

/// 总线连接参数。
#[derive(Debug, Clone, PartialEq)]
pub struct BusSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub reconnect_seconds: u64,
    pub mock_enabled: bool,
}

/// 运行设置（整体按子对象合并更新）。
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub alarm_thresholds: AlarmThresholds,
    pub preferences: UserPreferences,
    pub bus: BusSettings,
}
