//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 储罐：/tanks/*（查询与命令）
//! - 酒库：/cuveries/*（配置查询与总体模式）
//! - 告警：/alarms/*
//! - 审计事件：/events
//! - 运行设置：/settings
//! - 网关控制：/gateway/*（模式查询与热切换）
//! - 指标：/metrics
//! - 实时推送：/ws

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 返回包含所有 API 端点的 Router，支持 / 和 /api/ 两种前缀
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/tanks", get(list_tanks))
        .route("/tanks/:index", get(get_tank))
        .route("/tanks/:index/setpoint", post(set_setpoint))
        .route("/tanks/:index/running", post(set_running))
        .route("/tanks/:index/contents", post(set_contents))
        .route("/cuveries", get(list_cuveries))
        .route("/cuveries/:cuverie_id/mode", post(set_cuverie_mode))
        .route("/alarms", get(list_alarms))
        .route("/alarms/:alarm_id/acknowledge", post(acknowledge_alarm))
        .route("/events", get(list_events))
        .route("/settings", get(get_settings).patch(update_settings))
        .route("/gateway", get(get_gateway))
        .route("/gateway/mode", post(set_gateway_mode))
        .route("/metrics", get(get_metrics))
        .route("/ws", get(ws_endpoint))
}
