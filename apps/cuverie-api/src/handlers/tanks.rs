//! 储罐 handlers
//!
//! - GET /tanks
//! - GET /tanks/{index}
//! - POST /tanks/{index}/setpoint
//! - POST /tanks/{index}/running
//! - POST /tanks/{index}/contents
//!
//! 命令路径统一为：注册表更新 → 命令发布 → 审计事件。
//! 针对未知或软删除储罐的命令返回 not found。

use crate::AppState;
use crate::handlers::{append_command_event, visible_tanks};
use crate::utils::now_epoch_ms;
use crate::utils::response::{bad_request_error, not_found_error, storage_error, tank_to_dto};
use api_contract::{ApiResponse, ContentsRequest, RunningRequest, SetpointRequest, TankDto};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_gateway::TankCommand;
use cuverie_storage::TankStore;
use domain::{TankContents, TankStatus};
use tracing::warn;

#[derive(serde::Deserialize)]
pub struct TankPath {
    pub(crate) index: u32,
}

pub async fn list_tanks(State(state): State<AppState>) -> Response {
    match visible_tanks(&state).await {
        Ok(tanks) => {
            let data: Vec<TankDto> = tanks.into_iter().map(tank_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_tank(State(state): State<AppState>, Path(path): Path<TankPath>) -> Response {
    // 软删除的储罐仍可按 index 查询（只是从默认列表剔除）
    match state.tanks.get(path.index).await {
        Ok(Some(tank)) => {
            (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(tank)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

pub async fn set_setpoint(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    Json(req): Json<SetpointRequest>,
) -> Response {
    if !(-10.0..=60.0).contains(&req.value) {
        return bad_request_error("setpoint out of range");
    }
    if let Err(response) = require_active_tank(&state, path.index).await {
        return response;
    }

    let value = req.value;
    let now_ms = now_epoch_ms();
    let updated = match state
        .tanks
        .update(
            path.index,
            Box::new(move |tank| {
                tank.setpoint = Some(value);
                tank.last_updated_at_ms = now_ms;
            }),
        )
        .await
    {
        Ok(Some(tank)) => tank,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };

    publish_command(&state, path.index, &TankCommand::Setpoint(value)).await;
    append_command_event(
        &state,
        Some(path.index),
        format!("Setpoint {value}°C requested for tank {}", path.index),
        Some(format!("{{\"setpoint\":{value}}}")),
    )
    .await;
    (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(updated)))).into_response()
}

pub async fn set_running(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    Json(req): Json<RunningRequest>,
) -> Response {
    if let Err(response) = require_active_tank(&state, path.index).await {
        return response;
    }

    let running = req.value;
    let now_ms = now_epoch_ms();
    let updated = match state
        .tanks
        .update(
            path.index,
            Box::new(move |tank| {
                tank.is_running = running;
                tank.status = if running {
                    TankStatus::Cooling
                } else {
                    TankStatus::Idle
                };
                tank.last_updated_at_ms = now_ms;
            }),
        )
        .await
    {
        Ok(Some(tank)) => tank,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };

    publish_command(&state, path.index, &TankCommand::Running(running)).await;
    append_command_event(
        &state,
        Some(path.index),
        format!(
            "Tank {} {}",
            path.index,
            if running { "started" } else { "stopped" }
        ),
        Some(format!("{{\"running\":{running}}}")),
    )
    .await;
    (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(updated)))).into_response()
}

pub async fn set_contents(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    Json(req): Json<ContentsRequest>,
) -> Response {
    let grape = req.grape.trim().to_string();
    if grape.is_empty() {
        return bad_request_error("grape must not be empty");
    }
    if let Some(vintage) = req.vintage {
        if !(1900..=2100).contains(&vintage) {
            return bad_request_error("vintage out of range");
        }
    }
    if let Some(volume) = req.volume_liters {
        if volume <= 0.0 {
            return bad_request_error("volumeLiters must be positive");
        }
    }
    if let Err(response) = require_active_tank(&state, path.index).await {
        return response;
    }

    let contents = TankContents {
        grape: grape.clone(),
        vintage: req.vintage,
        volume_liters: req.volume_liters,
        notes: req.notes,
    };
    let now_ms = now_epoch_ms();
    let updated = match state
        .tanks
        .update(
            path.index,
            Box::new(move |tank| {
                tank.contents = Some(contents);
                tank.last_updated_at_ms = now_ms;
            }),
        )
        .await
    {
        Ok(Some(tank)) => tank,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };

    // 设备只认主描述符，其余字段仅保存在本地
    publish_command(&state, path.index, &TankCommand::Contents(grape.clone())).await;
    append_command_event(
        &state,
        Some(path.index),
        format!("Contents of tank {} set to {grape}", path.index),
        None,
    )
    .await;
    (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(updated)))).into_response()
}

/// 命令目标必须存在且未软删除。
async fn require_active_tank(state: &AppState, index: u32) -> Result<(), Response> {
    match state.tanks.get(index).await {
        Ok(Some(tank)) if !tank.is_deleted => Ok(()),
        Ok(_) => Err(not_found_error()),
        Err(err) => Err(storage_error(err)),
    }
}

/// 总线连通性从不作为请求错误暴露，发布失败只记日志。
async fn publish_command(state: &AppState, index: u32, command: &TankCommand) {
    if let Err(err) = state.gateway.publish_command(index, command).await {
        warn!(target: "cuverie.api", index, "command publish failed: {}", err);
    }
}
