//! Cuverie 监控后端入口：装配注册表、网关与 HTTP/WS 服务。

mod events;
mod handlers;
mod routes;
mod utils;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use cuverie_config::AppConfig;
use cuverie_gateway::{Gateway, GatewayConfig};
use cuverie_storage::{
    AlarmStore, FacilityStore, InMemoryAlarmStore, InMemoryEventLogStore, InMemoryFacilityStore,
    InMemoryHistoryStore, InMemoryModeStore, InMemorySettingsStore, InMemoryTankStore, ModeStore,
    PgEventLogStore, SettingsStore, TankStore, connect_pool, seed_demo_fleet,
};
use cuverie_telemetry::{init_tracing, new_request_ids};
use domain::{AlarmThresholds, BusSettings, Settings, UserPreferences};
use events::MirroredEventLog;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info, warn};

/// 全部 handler 共享的应用状态。
#[derive(Clone)]
pub struct AppState {
    pub tanks: Arc<dyn TankStore>,
    pub facilities: Arc<dyn FacilityStore>,
    pub modes: Arc<dyn ModeStore>,
    pub alarms: Arc<dyn AlarmStore>,
    pub events: Arc<MirroredEventLog>,
    pub settings: Arc<dyn SettingsStore>,
    pub gateway: Arc<Gateway>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 内存注册表
    let tanks = Arc::new(InMemoryTankStore::new());
    let history = Arc::new(InMemoryHistoryStore::new());
    let facilities = Arc::new(InMemoryFacilityStore::new());
    let modes = Arc::new(InMemoryModeStore::new());
    let alarms = Arc::new(InMemoryAlarmStore::new());
    if config.seed_demo {
        seed_demo_fleet(
            tanks.as_ref(),
            history.as_ref(),
            facilities.as_ref(),
            modes.as_ref(),
            alarms.as_ref(),
            utils::now_epoch_ms(),
        )
        .await?;
        info!("demo fleet seeded");
    }

    // 可选的 Postgres 事件镜像（失败不阻塞启动）
    let mirror = match config.database_url.as_deref() {
        Some(url) => match connect_pool(url).await {
            Ok(pool) => {
                info!("event mirror: postgres");
                Some(Arc::new(PgEventLogStore::new(pool)))
            }
            Err(err) => {
                warn!("postgres unavailable, events stay in memory: {}", err);
                None
            }
        },
        None => None,
    };
    let events = Arc::new(MirroredEventLog::new(
        Arc::new(InMemoryEventLogStore::new()),
        mirror,
    ));

    let settings = Arc::new(InMemorySettingsStore::new(initial_settings(&config)));

    // 网关：有 broker URL 且未强制 Mock 时以 Live 启动
    let gateway = Arc::new(Gateway::new(
        GatewayConfig {
            mqtt_url: config.mqtt_url.clone(),
            mqtt_username: config.mqtt_username.clone(),
            mqtt_password: config.mqtt_password.clone(),
            reconnect: Duration::from_secs(config.mqtt_reconnect_seconds),
            force_mock: config.mqtt_mock,
            mock_interval: Duration::from_millis(config.mock_interval_ms),
            offline_timeout: Duration::from_secs(config.offline_timeout_seconds),
            offline_sweep: Duration::from_secs(config.offline_sweep_seconds),
        },
        tanks.clone(),
        history.clone(),
        facilities.clone(),
        modes.clone(),
        events.clone(),
    ));
    gateway.start().await;

    let state = AppState {
        tanks,
        facilities,
        modes,
        alarms,
        events,
        settings,
        gateway: gateway.clone(),
    };

    // 路由同时挂在 / 与 /api/ 两个前缀下
    let app = Router::new()
        .merge(routes::create_api_router())
        .nest("/api", routes::create_api_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_context)),
        );

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("cuverie backend listening on {}", config.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 停机前拆除网关的后台任务与总线连接
    gateway.stop().await;
    info!("gateway stopped, bye");
    Ok(())
}

/// 从运行配置派生初始设置（阈值与偏好取产品默认值）。
fn initial_settings(config: &AppConfig) -> Settings {
    Settings {
        alarm_thresholds: AlarmThresholds {
            high: 26.0,
            low: 16.0,
        },
        preferences: UserPreferences {
            locale: "fr-FR".to_string(),
            temperature_unit: "C".to_string(),
            theme: "auto".to_string(),
        },
        bus: BusSettings {
            url: config.mqtt_url.clone(),
            username: config.mqtt_username.clone(),
            password: config.mqtt_password.clone(),
            reconnect_seconds: config.mqtt_reconnect_seconds,
            mock_enabled: config.mqtt_mock,
        },
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
