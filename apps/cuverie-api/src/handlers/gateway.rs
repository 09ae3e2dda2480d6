//! 网关状态 handlers
//!
//! - GET /health
//! - GET /gateway
//! - POST /gateway/mode（mock | live 热切换，完整的 stop-then-start）

use crate::AppState;
use crate::utils::response::bad_request_error;
use api_contract::{ApiResponse, GatewayModeRequest, GatewayStatusDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_gateway::GatewayMode;

pub async fn health(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "mqttMode": state.gateway.mode().await.as_str(),
    }))
    .into_response()
}

pub async fn get_gateway(State(state): State<AppState>) -> Response {
    let status = GatewayStatusDto {
        mode: state.gateway.mode().await.as_str().to_string(),
        connected: state.gateway.connected(),
    };
    (StatusCode::OK, Json(ApiResponse::success(status))).into_response()
}

pub async fn set_gateway_mode(
    State(state): State<AppState>,
    Json(req): Json<GatewayModeRequest>,
) -> Response {
    let Some(mode) = GatewayMode::parse(&req.mode) else {
        return bad_request_error("mode must be mock or live");
    };
    state.gateway.switch_mode(mode).await;
    let status = GatewayStatusDto {
        mode: state.gateway.mode().await.as_str().to_string(),
        connected: state.gateway.connected(),
    };
    (StatusCode::OK, Json(ApiResponse::success(status))).into_response()
}
