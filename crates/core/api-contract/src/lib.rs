//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 温度采样点返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSampleDto {
    pub ts_ms: i64,
    pub value: f64,
}

/// 储罐内容物返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankContentsDto {
    pub grape: String,
    pub vintage: Option<i32>,
    pub volume_liters: Option<f64>,
    pub notes: Option<String>,
}

/// 储罐返回结构。
///
/// `temperature`/`setpoint` 为 null 表示从未观测到。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankDto {
    pub index: u32,
    pub id: String,
    pub name: String,
    pub status: String,
    pub temperature: Option<f64>,
    pub setpoint: Option<f64>,
    pub capacity_liters: f64,
    pub fill_level_percent: f64,
    pub contents: Option<TankContentsDto>,
    pub is_running: bool,
    pub last_updated_at_ms: i64,
    pub history: Vec<TemperatureSampleDto>,
    pub alarms: Vec<String>,
    pub facility_id: Option<String>,
    pub is_deleted: bool,
}

/// 储罐槽位返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankSlotDto {
    pub id: String,
    pub index: u32,
    pub display_name: String,
    pub order: u32,
}

/// 酒库返回结构（附总体模式）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CuverieDto {
    pub id: String,
    pub name: String,
    pub mode: String,
    pub tanks: Vec<TankSlotDto>,
}

/// 告警返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDto {
    pub id: String,
    pub tank_index: u32,
    pub severity: String,
    pub message: String,
    pub triggered_at_ms: i64,
    pub acknowledged: bool,
}

/// 审计事件返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: String,
    pub ts_ms: i64,
    pub tank_index: Option<u32>,
    pub category: String,
    pub source: String,
    pub summary: String,
    pub details: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// 告警阈值返回/更新结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmThresholdsDto {
    pub high: f64,
    pub low: f64,
}

/// 用户偏好返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferencesDto {
    pub locale: String,
    pub temperature_unit: String,
    pub theme: String,
}

/// 总线连接设置返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusSettingsDto {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub reconnect_seconds: u64,
    pub mock_enabled: bool,
}

/// 运行设置返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    pub alarm_thresholds: AlarmThresholdsDto,
    pub preferences: UserPreferencesDto,
    pub bus: BusSettingsDto,
}

/// 设置点命令请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetpointRequest {
    pub value: f64,
}

/// 启停命令请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningRequest {
    pub value: bool,
}

/// 内容物更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsRequest {
    pub grape: String,
    pub vintage: Option<i32>,
    pub volume_liters: Option<f64>,
    pub notes: Option<String>,
}

/// 酒库总体模式请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityModeRequest {
    pub mode: String,
}

/// 网关运行模式请求体（mock | live）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayModeRequest {
    pub mode: String,
}

/// 网关状态返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatusDto {
    pub mode: String,
    pub connected: bool,
}

/// 事件查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub limit: Option<i64>,
}

/// 告警阈值更新请求体（字段级可选）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmThresholdsPatch {
    pub high: Option<f64>,
    pub low: Option<f64>,
}

/// 用户偏好更新请求体（字段级可选）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferencesPatch {
    pub locale: Option<String>,
    pub temperature_unit: Option<String>,
    pub theme: Option<String>,
}

/// 总线连接设置更新请求体（字段级可选）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusSettingsPatch {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub reconnect_seconds: Option<u64>,
    pub mock_enabled: Option<bool>,
}

/// 设置更新请求体（每个子对象独立可选）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatchRequest {
    pub alarm_thresholds: Option<AlarmThresholdsPatch>,
    pub preferences: Option<UserPreferencesPatch>,
    pub bus: Option<BusSettingsPatch>,
}

/// WebSocket 推送载荷。
///
/// `type` 字段区分消息种类，与连接握手无关（握手由推送层负责）。
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum PushMessageDto {
    #[serde(rename = "tanks:init")]
    TanksInit { tanks: Vec<TankDto> },
    #[serde(rename = "tanks:update")]
    TanksUpdate { tank: TankDto, source: String },
    #[serde(rename = "config:update")]
    ConfigUpdate { cuveries: Vec<CuverieDto> },
}

/// 指标快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub raw_messages: u64,
    pub decode_failures: u64,
    pub telemetry_applied: u64,
    pub telemetry_dropped_unknown: u64,
    pub config_snapshots: u64,
    pub tanks_marked_offline: u64,
    pub commands_published: u64,
    pub commands_suppressed: u64,
    pub audit_append_failures: u64,
    pub mock_ticks: u64,
    pub reconnects: u64,
}
