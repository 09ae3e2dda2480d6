//! 运行设置 handlers
//!
//! - GET /settings
//! - PATCH /settings（每个子对象独立可选，子对象内部按字段合并）

use crate::AppState;
use crate::utils::response::{bad_request_error, settings_to_dto, storage_error};
use api_contract::{ApiResponse, SettingsPatchRequest};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_storage::{
    AlarmThresholdsUpdate, BusSettingsUpdate, SettingsStore, SettingsUpdate,
    UserPreferencesUpdate,
};

pub async fn get_settings(State(state): State<AppState>) -> Response {
    match state.settings.get().await {
        Ok(settings) => (
            StatusCode::OK,
            Json(ApiResponse::success(settings_to_dto(settings))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsPatchRequest>,
) -> Response {
    let mut update = SettingsUpdate::default();

    if let Some(thresholds) = req.alarm_thresholds {
        for value in [thresholds.high, thresholds.low].into_iter().flatten() {
            if !(-10.0..=80.0).contains(&value) {
                return bad_request_error("threshold out of range");
            }
        }
        update.alarm_thresholds = Some(AlarmThresholdsUpdate {
            high: thresholds.high,
            low: thresholds.low,
        });
    }

    if let Some(preferences) = req.preferences {
        if let Some(unit) = preferences.temperature_unit.as_deref() {
            if !matches!(unit, "C" | "F") {
                return bad_request_error("temperatureUnit must be C or F");
            }
        }
        if let Some(theme) = preferences.theme.as_deref() {
            if !matches!(theme, "light" | "dark" | "auto") {
                return bad_request_error("theme must be light, dark or auto");
            }
        }
        update.preferences = Some(UserPreferencesUpdate {
            locale: preferences.locale,
            temperature_unit: preferences.temperature_unit,
            theme: preferences.theme,
        });
    }

    if let Some(bus) = req.bus {
        update.bus = Some(BusSettingsUpdate {
            url: bus.url,
            username: bus.username,
            password: bus.password,
            reconnect_seconds: bus.reconnect_seconds,
            mock_enabled: bus.mock_enabled,
        });
    }

    match state.settings.update(update).await {
        Ok(settings) => (
            StatusCode::OK,
            Json(ApiResponse::success(settings_to_dto(settings))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}
