//! 存储层输入模型与容量常量。

/// 单储罐温度历史保留的采样点上限（满后丢弃最旧）。
pub const HISTORY_CAP: usize = 48;

/// 内存事件日志环形缓冲上限（长期存储由 Postgres 镜像负责）。
pub const EVENT_LOG_CAP: usize = 500;

/// 告警阈值更新输入。
#[derive(Debug, Clone, Default)]
pub struct AlarmThresholdsUpdate {
    pub high: Option<f64>,
    pub low: Option<f64>,
}

/// 用户偏好更新输入。
#[derive(Debug, Clone, Default)]
pub struct UserPreferencesUpdate {
    pub locale: Option<String>,
    pub temperature_unit: Option<String>,
    pub theme: Option<String>,
}

/// 总线连接设置更新输入。
#[derive(Debug, Clone, Default)]
pub struct BusSettingsUpdate {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub reconnect_seconds: Option<u64>,
    pub mock_enabled: Option<bool>,
}

/// 设置更新输入（每个子对象独立可选，子对象内部按字段合并）。
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub alarm_thresholds: Option<AlarmThresholdsUpdate>,
    pub preferences: Option<UserPreferencesUpdate>,
    pub bus: Option<BusSettingsUpdate>,
}
