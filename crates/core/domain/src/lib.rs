pub mod models;

pub use models::{
    Alarm, AlarmThresholds, BusSettings, EventRecord, FacilityConfig, FacilityWithMode, Settings,
    Tank, TankContents, TankSlot, TemperatureSample, UserPreferences, configured_indices,
};

/// 储罐运行状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankStatus {
    Idle,
    Cooling,
    Heating,
    Alarm,
    Offline,
}

impl TankStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TankStatus::Idle => "idle",
            TankStatus::Cooling => "cooling",
            TankStatus::Heating => "heating",
            TankStatus::Alarm => "alarm",
            TankStatus::Offline => "offline",
        }
    }
}

/// 酒库（cuverie）总体运行模式。
///
/// 线路取值为大写枚举名（HEAT / COOL / STOP）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralMode {
    Heat,
    Cool,
    Stop,
}

impl GeneralMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneralMode::Heat => "HEAT",
            GeneralMode::Cool => "COOL",
            GeneralMode::Stop => "STOP",
        }
    }

    /// 大小写不敏感解析；无法识别时返回 None（调用方按 no-op 处理）。
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HEAT" => Some(GeneralMode::Heat),
            "COOL" => Some(GeneralMode::Cool),
            "STOP" => Some(GeneralMode::Stop),
            _ => None,
        }
    }
}

/// 遥测事件来源标记。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetrySource {
    Bus,
    Mock,
}

impl TelemetrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetrySource::Bus => "bus",
            TelemetrySource::Mock => "mock",
        }
    }
}

/// 告警严重级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmSeverity {
    Info,
    Warning,
    Critical,
}

impl AlarmSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmSeverity::Info => "info",
            AlarmSeverity::Warning => "warning",
            AlarmSeverity::Critical => "critical",
        }
    }
}

/// 审计事件分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Command,
    Telemetry,
    Alarm,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Command => "command",
            EventCategory::Telemetry => "telemetry",
            EventCategory::Alarm => "alarm",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "command" => Some(EventCategory::Command),
            "telemetry" => Some(EventCategory::Telemetry),
            "alarm" => Some(EventCategory::Alarm),
            _ => None,
        }
    }
}

/// 审计事件来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    User,
    System,
    Backend,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::User => "user",
            EventSource::System => "system",
            EventSource::Backend => "backend",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(EventSource::User),
            "system" => Some(EventSource::System),
            "backend" => Some(EventSource::Backend),
            _ => None,
        }
    }
}
