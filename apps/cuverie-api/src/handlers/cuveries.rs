//! 酒库 handlers
//!
//! - GET /cuveries
//! - POST /cuveries/{id}/mode

use crate::AppState;
use crate::handlers::append_command_event;
use crate::utils::response::{bad_request_error, cuverie_to_dto, not_found_error, storage_error};
use api_contract::{ApiResponse, CuverieDto, FacilityModeRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_storage::{FacilityStore, ModeStore};
use domain::{FacilityWithMode, GeneralMode};
use tracing::warn;

#[derive(serde::Deserialize)]
pub struct CuveriePath {
    pub(crate) cuverie_id: String,
}

pub async fn list_cuveries(State(state): State<AppState>) -> Response {
    let facilities = match state.facilities.list().await {
        Ok(facilities) => facilities,
        Err(err) => return storage_error(err),
    };
    let mut data: Vec<CuverieDto> = Vec::with_capacity(facilities.len());
    for config in facilities {
        let mode = match state.modes.get(&config.id).await {
            Ok(mode) => mode.unwrap_or(GeneralMode::Stop),
            Err(err) => return storage_error(err),
        };
        data.push(cuverie_to_dto(FacilityWithMode { config, mode }));
    }
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub async fn set_cuverie_mode(
    State(state): State<AppState>,
    Path(path): Path<CuveriePath>,
    Json(req): Json<FacilityModeRequest>,
) -> Response {
    let Some(mode) = GeneralMode::parse(&req.mode) else {
        return bad_request_error("mode must be one of HEAT, COOL, STOP");
    };
    let facility = match state.facilities.get(&path.cuverie_id).await {
        Ok(Some(facility)) => facility,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };

    if let Err(err) = state.gateway.set_general_mode(&facility.id, mode).await {
        return storage_error(err);
    }
    // 设备侧按酒库原始名订阅模式 topic
    if let Err(err) = state.gateway.publish_general_mode(&facility.name, mode).await {
        warn!(target: "cuverie.api", cuverie = %facility.id, "mode publish failed: {}", err);
    }
    append_command_event(
        &state,
        None,
        format!("General mode {} applied to {}", mode.as_str(), facility.name),
        Some(format!("{{\"cuverieId\":\"{}\"}}", facility.id)),
    )
    .await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "id": facility.id,
            "mode": mode.as_str(),
        }))),
    )
        .into_response()
}
