//! 审计事件 handlers
//!
//! - GET /events?limit=

use crate::AppState;
use crate::utils::response::{event_to_dto, storage_error};
use api_contract::{ApiResponse, EventDto, EventQuery};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_storage::EventLogStore;

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(100).clamp(1, 500) as usize;
    match state.events.list(limit).await {
        Ok(events) => {
            let data: Vec<EventDto> = events.into_iter().map(event_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}
