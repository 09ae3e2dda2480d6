//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 网关链路指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub raw_messages: u64,
    pub decode_failures: u64,
    pub telemetry_applied: u64,
    pub telemetry_dropped_unknown: u64,
    pub config_snapshots: u64,
    pub tanks_marked_offline: u64,
    pub commands_published: u64,
    pub commands_suppressed: u64,
    pub audit_append_failures: u64,
    pub mock_ticks: u64,
    pub reconnects: u64,
}

/// 网关链路指标。
pub struct TelemetryMetrics {
    raw_messages: AtomicU64,
    decode_failures: AtomicU64,
    telemetry_applied: AtomicU64,
    telemetry_dropped_unknown: AtomicU64,
    config_snapshots: AtomicU64,
    tanks_marked_offline: AtomicU64,
    commands_published: AtomicU64,
    commands_suppressed: AtomicU64,
    audit_append_failures: AtomicU64,
    mock_ticks: AtomicU64,
    reconnects: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            raw_messages: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            telemetry_applied: AtomicU64::new(0),
            telemetry_dropped_unknown: AtomicU64::new(0),
            config_snapshots: AtomicU64::new(0),
            tanks_marked_offline: AtomicU64::new(0),
            commands_published: AtomicU64::new(0),
            commands_suppressed: AtomicU64::new(0),
            audit_append_failures: AtomicU64::new(0),
            mock_ticks: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            raw_messages: self.raw_messages.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            telemetry_applied: self.telemetry_applied.load(Ordering::Relaxed),
            telemetry_dropped_unknown: self.telemetry_dropped_unknown.load(Ordering::Relaxed),
            config_snapshots: self.config_snapshots.load(Ordering::Relaxed),
            tanks_marked_offline: self.tanks_marked_offline.load(Ordering::Relaxed),
            commands_published: self.commands_published.load(Ordering::Relaxed),
            commands_suppressed: self.commands_suppressed.load(Ordering::Relaxed),
            audit_append_failures: self.audit_append_failures.load(Ordering::Relaxed),
            mock_ticks: self.mock_ticks.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录总线原始消息接收次数。
pub fn record_raw_message() {
    metrics().raw_messages.fetch_add(1, Ordering::Relaxed);
}

/// 记录报文解码失败次数。
pub fn record_decode_failure() {
    metrics().decode_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录遥测成功应用次数。
pub fn record_telemetry_applied() {
    metrics().telemetry_applied.fetch_add(1, Ordering::Relaxed);
}

/// 记录因目标未知/已删除而丢弃的遥测次数。
pub fn record_telemetry_dropped_unknown() {
    metrics()
        .telemetry_dropped_unknown
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录配置快照对账次数。
pub fn record_config_snapshot() {
    metrics().config_snapshots.fetch_add(1, Ordering::Relaxed);
}

/// 记录离线迁移次数（心跳超时）。
pub fn record_tank_marked_offline() {
    metrics()
        .tanks_marked_offline
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录命令发布成功次数（Live 模式）。
pub fn record_command_published() {
    metrics().commands_published.fetch_add(1, Ordering::Relaxed);
}

/// 记录命令被抑制次数（Mock 模式只记录不发送）。
pub fn record_command_suppressed() {
    metrics()
        .commands_suppressed
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录审计事件写入失败次数（尽力而为，不影响主链路）。
pub fn record_audit_append_failure() {
    metrics()
        .audit_append_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录 Mock 生成器触发次数。
pub fn record_mock_tick() {
    metrics().mock_ticks.fetch_add(1, Ordering::Relaxed);
}

/// 记录总线重连尝试次数。
pub fn record_reconnect() {
    metrics().reconnects.fetch_add(1, Ordering::Relaxed);
}
