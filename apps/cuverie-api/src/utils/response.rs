//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和实体 → DTO 转换函数：
//! - 错误响应：bad_request_error, not_found_error, storage_error
//! - DTO 转换：tank_to_dto, cuverie_to_dto, alarm_to_dto, event_to_dto,
//!   settings_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - HTTP 状态码与错误码对应

use api_contract::{
    AlarmDto, AlarmThresholdsDto, ApiResponse, BusSettingsDto, CuverieDto, EventDto, SettingsDto,
    TankContentsDto, TankDto, TankSlotDto, TemperatureSampleDto, UserPreferencesDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_storage::StorageError;
use domain::{Alarm, EventRecord, FacilityWithMode, Settings, Tank};

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// Tank 转 TankDto
pub fn tank_to_dto(tank: Tank) -> TankDto {
    TankDto {
        index: tank.index,
        id: tank.id,
        name: tank.name,
        status: tank.status.as_str().to_string(),
        temperature: tank.temperature,
        setpoint: tank.setpoint,
        capacity_liters: tank.capacity_liters,
        fill_level_percent: tank.fill_level_percent,
        contents: tank.contents.map(|contents| TankContentsDto {
            grape: contents.grape,
            vintage: contents.vintage,
            volume_liters: contents.volume_liters,
            notes: contents.notes,
        }),
        is_running: tank.is_running,
        last_updated_at_ms: tank.last_updated_at_ms,
        history: tank
            .history
            .into_iter()
            .map(|sample| TemperatureSampleDto {
                ts_ms: sample.ts_ms,
                value: sample.value,
            })
            .collect(),
        alarms: tank.alarms,
        facility_id: tank.facility_id,
        is_deleted: tank.is_deleted,
    }
}

/// FacilityWithMode 转 CuverieDto
pub fn cuverie_to_dto(facility: FacilityWithMode) -> CuverieDto {
    CuverieDto {
        id: facility.config.id,
        name: facility.config.name,
        mode: facility.mode.as_str().to_string(),
        tanks: facility
            .config
            .tanks
            .into_iter()
            .map(|slot| TankSlotDto {
                id: slot.id,
                index: slot.index,
                display_name: slot.display_name,
                order: slot.order,
            })
            .collect(),
    }
}

/// Alarm 转 AlarmDto
pub fn alarm_to_dto(alarm: Alarm) -> AlarmDto {
    AlarmDto {
        id: alarm.id,
        tank_index: alarm.tank_index,
        severity: alarm.severity.as_str().to_string(),
        message: alarm.message,
        triggered_at_ms: alarm.triggered_at_ms,
        acknowledged: alarm.acknowledged,
    }
}

/// EventRecord 转 EventDto（metadata 尝试解析为结构化 JSON）
pub fn event_to_dto(event: EventRecord) -> EventDto {
    let metadata = event
        .metadata
        .as_deref()
        .and_then(|text| serde_json::from_str(text).ok());
    EventDto {
        id: event.id,
        ts_ms: event.ts_ms,
        tank_index: event.tank_index,
        category: event.category.as_str().to_string(),
        source: event.source.as_str().to_string(),
        summary: event.summary,
        details: event.details,
        metadata,
    }
}

/// Settings 转 SettingsDto
pub fn settings_to_dto(settings: Settings) -> SettingsDto {
    SettingsDto {
        alarm_thresholds: AlarmThresholdsDto {
            high: settings.alarm_thresholds.high,
            low: settings.alarm_thresholds.low,
        },
        preferences: UserPreferencesDto {
            locale: settings.preferences.locale,
            temperature_unit: settings.preferences.temperature_unit,
            theme: settings.preferences.theme,
        },
        bus: BusSettingsDto {
            url: settings.bus.url,
            username: settings.bus.username,
            password: settings.bus.password,
            reconnect_seconds: settings.bus.reconnect_seconds,
            mock_enabled: settings.bus.mock_enabled,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::event_to_dto;
    use domain::{EventCategory, EventRecord, EventSource};

    #[test]
    fn event_metadata_parses_to_structured_json() {
        let event = EventRecord {
            id: "event-1".to_string(),
            ts_ms: 0,
            tank_index: Some(101),
            category: EventCategory::Telemetry,
            source: EventSource::Backend,
            summary: "Temperature 18.4°C on tank 101".to_string(),
            details: None,
            metadata: Some("{\"source\":\"bus\",\"value\":18.4}".to_string()),
        };
        let dto = event_to_dto(event);
        let metadata = dto.metadata.expect("metadata");
        assert_eq!(metadata["source"], "bus");
        assert_eq!(metadata["value"], 18.4);
    }
}
