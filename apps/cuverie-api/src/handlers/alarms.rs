//! 告警 handlers
//!
//! - GET /alarms
//! - POST /alarms/{id}/acknowledge

use crate::AppState;
use crate::utils::now_epoch_ms;
use crate::utils::response::{alarm_to_dto, not_found_error, storage_error};
use api_contract::{AlarmDto, ApiResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_storage::{AlarmStore, EventLogStore};
use domain::{EventCategory, EventRecord, EventSource};
use tracing::warn;

#[derive(serde::Deserialize)]
pub struct AlarmPath {
    pub(crate) alarm_id: String,
}

pub async fn list_alarms(State(state): State<AppState>) -> Response {
    match state.alarms.list().await {
        Ok(alarms) => {
            let data: Vec<AlarmDto> = alarms.into_iter().map(alarm_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub async fn acknowledge_alarm(
    State(state): State<AppState>,
    Path(path): Path<AlarmPath>,
) -> Response {
    let alarm = match state.alarms.acknowledge(&path.alarm_id).await {
        Ok(Some(alarm)) => alarm,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };

    let event = EventRecord {
        id: format!("alarm-ack-{}", uuid::Uuid::new_v4()),
        ts_ms: now_epoch_ms(),
        tank_index: Some(alarm.tank_index),
        category: EventCategory::Alarm,
        source: EventSource::User,
        summary: format!("Alarm acknowledged: {}", alarm.message),
        details: None,
        metadata: None,
    };
    if let Err(err) = state.events.append(event).await {
        warn!(target: "cuverie.api", "alarm audit append failed: {}", err);
    }

    (StatusCode::OK, Json(ApiResponse::success(alarm_to_dto(alarm)))).into_response()
}
