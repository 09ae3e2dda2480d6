//! 指标快照 handler
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cuverie_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            raw_messages: snapshot.raw_messages,
            decode_failures: snapshot.decode_failures,
            telemetry_applied: snapshot.telemetry_applied,
            telemetry_dropped_unknown: snapshot.telemetry_dropped_unknown,
            config_snapshots: snapshot.config_snapshots,
            tanks_marked_offline: snapshot.tanks_marked_offline,
            commands_published: snapshot.commands_published,
            commands_suppressed: snapshot.commands_suppressed,
            audit_append_failures: snapshot.audit_append_failures,
            mock_ticks: snapshot.mock_ticks,
            reconnects: snapshot.reconnects,
        })),
    )
        .into_response()
}
