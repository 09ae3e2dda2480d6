//! # 遥测与配置同步网关
//!
//! 系统核心：拥有总线连接（或 Mock 合成生成器），把外部松散类型的
//! 多 topic 流对账进内部储罐/酒库注册表，并向任意内部订阅方扇出
//! 派生事件，同时向设备回发命令。
//!
//! ## 模块划分
//!
//! - [`decode`]：topic + payload → 类型化解码结果（纯函数）
//! - [`reconcile`]：配置快照对账（创建/更新/软删除）
//! - [`liveness`]：心跳登记与离线巡检
//! - [`mock`]：Mock 模式合成遥测
//! - [`bus`]：Live 模式 rumqttc 接入
//! - [`commands`]：出站命令编码
//! - [`events`]：遥测/配置事件扇出
//!
//! ## 生命周期
//!
//! `Stopped → start() → Mock | Live`；`switch_mode` 永远是
//! 完整的 stop-then-start，绝不做部分重配置，避免悬挂订阅或
//! 双模式并发发射遥测。

mod bus;
pub mod commands;
pub mod decode;
pub mod events;
pub mod liveness;
pub mod reconcile;
mod mock;

pub use commands::{TankCommand, encode_general_mode, encode_tank_command};
pub use decode::{CONFIG_TOPIC, Decoded, DecodeError, TankUpdate, decode, normalize_facility_id};
pub use events::{ConfigEvent, Fanout, TelemetryEvent};
pub use liveness::{Heartbeats, is_stale};
pub use reconcile::ReconcileOutcome;

use cuverie_storage::{
    EventLogStore, FacilityStore, HISTORY_CAP, HistoryStore, ModeStore, StorageError, TankStore,
};
use cuverie_telemetry::{
    record_audit_append_failure, record_command_published, record_command_suppressed,
    record_config_snapshot, record_decode_failure, record_raw_message, record_telemetry_applied,
    record_telemetry_dropped_unknown,
};
use domain::{
    EventCategory, EventRecord, EventSource, FacilityWithMode, GeneralMode, Tank, TankContents,
    TankStatus, TelemetrySource, TemperatureSample,
};
use rumqttc::{AsyncClient, QoS};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 网关错误。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("bus error: {0}")]
    Bus(String),
    #[error("invalid broker url: {0}")]
    InvalidUrl(String),
}

/// 网关运行模式（对外可请求的两种）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Mock,
    Live,
}

impl GatewayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::Mock => "mock",
            GatewayMode::Live => "live",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mock" => Some(GatewayMode::Mock),
            "live" => Some(GatewayMode::Live),
            _ => None,
        }
    }
}

/// 网关运行参数。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub mqtt_url: Option<String>,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub reconnect: Duration,
    /// 强制 Mock（即便配置了 broker URL）
    pub force_mock: bool,
    pub mock_interval: Duration,
    pub offline_timeout: Duration,
    pub offline_sweep: Duration,
}

/// 活动模式资源。stop 时全部终止并释放，保证不残留后台任务。
enum ActiveState {
    Stopped,
    Mock {
        generator: JoinHandle<()>,
    },
    Live {
        client: AsyncClient,
        bus_task: JoinHandle<()>,
        sweep_task: JoinHandle<()>,
    },
}

struct GatewayState {
    mode: GatewayMode,
    active: ActiveState,
}

/// 各模式与巡检共享的存储、扇出与心跳登记。
pub struct GatewayShared {
    pub(crate) tanks: Arc<dyn TankStore>,
    pub(crate) history: Arc<dyn HistoryStore>,
    pub(crate) facilities: Arc<dyn FacilityStore>,
    pub(crate) modes: Arc<dyn ModeStore>,
    pub(crate) events: Arc<dyn EventLogStore>,
    pub(crate) fanout: Fanout,
    pub(crate) heartbeats: Heartbeats,
    pub(crate) connected: AtomicBool,
    pub(crate) offline_timeout: Duration,
    /// 入站消息、Mock 生成与离线巡检对注册表的变更必须彼此串行，
    /// 防止读-判-写交错造成丢失更新。入口处加锁，内部方法不重入。
    pub(crate) dispatch: Mutex<()>,
}

impl GatewayShared {
    /// 共享遥测应用路径：Live、Mock 与离线巡检都走这里。
    ///
    /// 未知或软删除的 index 静默丢弃 —— 只有配置能创建储罐，
    /// 遥测从不创建。
    pub(crate) async fn apply_telemetry(
        &self,
        index: u32,
        update: TankUpdate,
        source: TelemetrySource,
    ) -> Result<Option<Tank>, StorageError> {
        let current = match self.tanks.get(index).await? {
            Some(tank) if !tank.is_deleted => tank,
            _ => {
                record_telemetry_dropped_unknown();
                debug!(target: "cuverie.gateway", index, "telemetry dropped: unknown or deleted tank");
                return Ok(None);
            }
        };

        let now_ms = now_epoch_ms();
        if let Some(value) = update.temperature {
            self.history
                .append(index, TemperatureSample { ts_ms: now_ms, value })
                .await?;
            self.append_event(EventRecord {
                id: format!("telemetry-{index}-{now_ms}"),
                ts_ms: now_ms,
                tank_index: Some(index),
                category: EventCategory::Telemetry,
                source: audit_source(source),
                summary: format!("Temperature {value}°C on tank {index}"),
                details: None,
                metadata: Some(format!(
                    "{{\"source\":\"{}\",\"value\":{value}}}",
                    source.as_str()
                )),
            })
            .await;
        }
        let history = self.history.list(index, HISTORY_CAP).await?;
        let went_offline =
            update.status == Some(TankStatus::Offline) && current.status != TankStatus::Offline;

        let updated = self
            .tanks
            .update(
                index,
                Box::new(move |tank| {
                    if let Some(value) = update.temperature {
                        tank.temperature = Some(value);
                    }
                    if let Some(value) = update.setpoint {
                        tank.setpoint = Some(value);
                    }
                    if let Some(status) = update.status {
                        tank.status = status;
                    }
                    if let Some(running) = update.is_running {
                        tank.is_running = running;
                    }
                    if let Some(grape) = update.contents_grape {
                        merge_contents(tank, grape);
                    }
                    tank.history = history;
                    tank.last_updated_at_ms = now_ms;
                }),
            )
            .await?;
        let Some(updated) = updated else {
            return Ok(None);
        };

        record_telemetry_applied();
        if went_offline {
            self.append_event(EventRecord {
                id: format!("offline-{index}-{now_ms}"),
                ts_ms: now_ms,
                tank_index: Some(index),
                category: EventCategory::Telemetry,
                source: EventSource::System,
                summary: format!("Tank {index} went offline"),
                details: None,
                metadata: None,
            })
            .await;
        }
        self.fanout.emit_telemetry(TelemetryEvent {
            tank: updated.clone(),
            source,
        });
        Ok(Some(updated))
    }

    /// 对账并发出配置变更事件。
    pub(crate) async fn reconcile_snapshot(
        &self,
        snapshot: &[domain::FacilityConfig],
    ) -> Result<ReconcileOutcome, StorageError> {
        let outcome = reconcile::reconcile(
            self.tanks.as_ref(),
            self.facilities.as_ref(),
            self.modes.as_ref(),
            snapshot,
            now_epoch_ms(),
        )
        .await?;
        record_config_snapshot();
        self.emit_config().await?;
        Ok(outcome)
    }

    /// 重新读取酒库列表并附上模式，扇出配置变更事件。
    pub(crate) async fn emit_config(&self) -> Result<(), StorageError> {
        let facilities = self.facilities.list().await?;
        let mut enriched = Vec::with_capacity(facilities.len());
        for config in facilities {
            let mode = self
                .modes
                .get(&config.id)
                .await?
                .unwrap_or(GeneralMode::Stop);
            enriched.push(FacilityWithMode { config, mode });
        }
        self.fanout.emit_config(ConfigEvent {
            facilities: enriched,
        });
        Ok(())
    }

    /// 审计写入是尽力而为：失败只记日志与指标，绝不影响主状态。
    pub(crate) async fn append_event(&self, event: EventRecord) {
        if let Err(err) = self.events.append(event).await {
            record_audit_append_failure();
            warn!(target: "cuverie.gateway", "audit append failed: {}", err);
        }
    }

    /// 总线入站消息处理（Live 模式事件循环调用）。
    pub(crate) async fn handle_bus_message(
        shared: &Arc<GatewayShared>,
        client: &AsyncClient,
        topic: &str,
        payload: &[u8],
    ) {
        let _guard = shared.dispatch.lock().await;
        record_raw_message();
        match decode(topic, payload) {
            Ok(Decoded::ConfigSnapshot(snapshot)) => {
                match shared.reconcile_snapshot(&snapshot).await {
                    Ok(_) => {
                        // 储罐集合可能扩大，重新订阅字段 topic
                        bus::spawn_subscribe_tank_topics(shared.clone(), client.clone());
                    }
                    Err(err) => {
                        warn!(target: "cuverie.gateway", "reconcile failed: {}", err);
                    }
                }
            }
            Ok(Decoded::ModeChange { facility_id, mode }) => {
                if let Err(err) = shared.modes.set(&facility_id, mode).await {
                    warn!(target: "cuverie.gateway", "mode store failed: {}", err);
                    return;
                }
                if let Err(err) = shared.emit_config().await {
                    warn!(target: "cuverie.gateway", "config emit failed: {}", err);
                }
            }
            Ok(Decoded::TankField { index, update }) => {
                shared.heartbeats.touch(index);
                if let Err(err) = shared
                    .apply_telemetry(index, update, TelemetrySource::Bus)
                    .await
                {
                    warn!(target: "cuverie.gateway", index, "telemetry apply failed: {}", err);
                }
            }
            Ok(Decoded::Unrecognized) => {}
            Err(err) => {
                record_decode_failure();
                warn!(target: "cuverie.gateway", topic, "decode failed: {}", err);
            }
        }
    }
}

/// 遥测与配置同步网关。
///
/// 模式与连接状态的单一所有者：所有生命周期操作都在内部互斥锁下
/// 串行执行。
pub struct Gateway {
    shared: Arc<GatewayShared>,
    state: Mutex<GatewayState>,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(
        config: GatewayConfig,
        tanks: Arc<dyn TankStore>,
        history: Arc<dyn HistoryStore>,
        facilities: Arc<dyn FacilityStore>,
        modes: Arc<dyn ModeStore>,
        events: Arc<dyn EventLogStore>,
    ) -> Self {
        // 配置了 broker URL 且未强制 Mock 时偏向 Live
        let mode = if config.force_mock || config.mqtt_url.is_none() {
            GatewayMode::Mock
        } else {
            GatewayMode::Live
        };
        Self {
            shared: Arc::new(GatewayShared {
                tanks,
                history,
                facilities,
                modes,
                events,
                fanout: Fanout::new(),
                heartbeats: Heartbeats::new(),
                connected: AtomicBool::new(false),
                offline_timeout: config.offline_timeout,
                dispatch: Mutex::new(()),
            }),
            state: Mutex::new(GatewayState {
                mode,
                active: ActiveState::Stopped,
            }),
            config,
        }
    }

    /// 启动网关。已在运行时是 no-op。
    pub async fn start(&self) {
        let mut state = self.state.lock().await;
        if !matches!(state.active, ActiveState::Stopped) {
            return;
        }
        let mode = state.mode;
        self.start_locked(&mut state, mode);
        drop(state);
        // 启动即向订阅方播一次当前配置
        if let Err(err) = self.shared.emit_config().await {
            warn!(target: "cuverie.gateway", "initial config emit failed: {}", err);
        }
    }

    /// 停止网关并释放当前模式的全部资源。幂等。
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        self.teardown(&mut state).await;
    }

    /// 切换模式：完整的 stop-then-start。
    pub async fn switch_mode(&self, target: GatewayMode) {
        let mut state = self.state.lock().await;
        self.teardown(&mut state).await;
        state.mode = target;
        self.start_locked(&mut state, target);
    }

    /// 当前请求的模式（Stopped 时返回上次的模式，与启动语义一致）。
    pub async fn mode(&self) -> GatewayMode {
        self.state.lock().await.mode
    }

    /// 总线连接状态（Mock 模式恒为 false）。
    pub fn connected(&self) -> bool {
        self.shared.connected.load(Ordering::Relaxed)
    }

    /// 订阅遥测事件流。
    pub fn on_telemetry(&self) -> tokio::sync::broadcast::Receiver<TelemetryEvent> {
        self.shared.fanout.on_telemetry()
    }

    /// 订阅配置变更事件流。
    pub fn on_config(&self) -> tokio::sync::broadcast::Receiver<ConfigEvent> {
        self.shared.fanout.on_config()
    }

    /// 应用一次遥测更新（共享路径，所有来源一致）。
    pub async fn apply_telemetry(
        &self,
        index: u32,
        update: TankUpdate,
        source: TelemetrySource,
    ) -> Result<Option<Tank>, StorageError> {
        let _guard = self.shared.dispatch.lock().await;
        self.shared.apply_telemetry(index, update, source).await
    }

    /// 对账一份配置快照并扇出配置变更事件。
    pub async fn reconcile_snapshot(
        &self,
        snapshot: &[domain::FacilityConfig],
    ) -> Result<ReconcileOutcome, StorageError> {
        let _guard = self.shared.dispatch.lock().await;
        self.shared.reconcile_snapshot(snapshot).await
    }

    /// 登记一次储罐心跳（解码到该 index 的任何遥测字段时）。
    pub fn touch_heartbeat(&self, index: u32) {
        self.shared.heartbeats.touch(index);
    }

    /// 手动执行一轮离线巡检，返回本轮标记数。
    pub async fn sweep_offline_once(&self) -> Result<usize, StorageError> {
        liveness::sweep_offline(&self.shared).await
    }

    /// 设置酒库总体模式并扇出配置变更（不负责总线发布）。
    pub async fn set_general_mode(
        &self,
        facility_id: &str,
        mode: GeneralMode,
    ) -> Result<(), StorageError> {
        let _guard = self.shared.dispatch.lock().await;
        self.shared.modes.set(facility_id, mode).await?;
        self.shared.emit_config().await
    }

    /// 发布单罐命令。
    ///
    /// Mock/Stopped 下命令被接受并记录但不发送（无设备可收），
    /// 调用方不会因此阻塞或失败。
    pub async fn publish_command(
        &self,
        index: u32,
        command: &TankCommand,
    ) -> Result<(), GatewayError> {
        let (topic, payload) = encode_tank_command(index, command);
        self.publish(topic, payload).await
    }

    /// 发布酒库总体模式。
    pub async fn publish_general_mode(
        &self,
        facility_name: &str,
        mode: GeneralMode,
    ) -> Result<(), GatewayError> {
        let (topic, payload) = encode_general_mode(facility_name, mode);
        self.publish(topic, payload).await
    }

    async fn publish(&self, topic: String, payload: String) -> Result<(), GatewayError> {
        let state = self.state.lock().await;
        match &state.active {
            ActiveState::Live { client, .. } => {
                client
                    .publish(&topic, QoS::AtLeastOnce, false, payload.clone())
                    .await
                    .map_err(|err| GatewayError::Bus(err.to_string()))?;
                record_command_published();
                info!(target: "cuverie.gateway", topic = %topic, payload = %payload, "command_published");
                Ok(())
            }
            _ => {
                record_command_suppressed();
                info!(target: "cuverie.gateway", topic = %topic, payload = %payload, "command_suppressed (mock)");
                Ok(())
            }
        }
    }

    fn start_locked(&self, state: &mut GatewayState, mode: GatewayMode) {
        match mode {
            GatewayMode::Live => {
                let Some(url) = self.config.mqtt_url.clone() else {
                    // 没有 broker URL 时退回 Mock（与请求的模式保持一致记录）
                    info!(target: "cuverie.gateway", "no broker url, falling back to mock");
                    state.mode = GatewayMode::Mock;
                    self.start_locked(state, GatewayMode::Mock);
                    return;
                };
                let bus_config = bus::BusConfig {
                    url,
                    username: self.config.mqtt_username.clone(),
                    password: self.config.mqtt_password.clone(),
                    reconnect: self.config.reconnect,
                };
                let (client, eventloop) = match bus::connect(&bus_config) {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!(target: "cuverie.gateway", "broker config invalid: {}; falling back to mock", err);
                        state.mode = GatewayMode::Mock;
                        self.start_locked(state, GatewayMode::Mock);
                        return;
                    }
                };
                info!(target: "cuverie.gateway", url = %bus_config.url, "gateway starting in live mode");
                let bus_task = bus::spawn_bus_loop(
                    self.shared.clone(),
                    client.clone(),
                    eventloop,
                    bus_config.reconnect,
                );
                let sweep_task =
                    liveness::spawn_sweep(self.shared.clone(), self.config.offline_sweep);
                state.active = ActiveState::Live {
                    client,
                    bus_task,
                    sweep_task,
                };
            }
            GatewayMode::Mock => {
                info!(target: "cuverie.gateway", "gateway starting in mock mode");
                let generator =
                    mock::spawn_generator(self.shared.clone(), self.config.mock_interval);
                state.active = ActiveState::Mock { generator };
            }
        }
    }

    /// 终止当前模式的全部后台活动；再次 start 前必须先完成。
    async fn teardown(&self, state: &mut GatewayState) {
        match std::mem::replace(&mut state.active, ActiveState::Stopped) {
            ActiveState::Stopped => {}
            ActiveState::Mock { generator } => {
                generator.abort();
            }
            ActiveState::Live {
                client,
                bus_task,
                sweep_task,
            } => {
                bus_task.abort();
                sweep_task.abort();
                let _ = client.disconnect().await;
            }
        }
        self.shared.connected.store(false, Ordering::Relaxed);
    }
}

/// 总线来源记账为 backend，本地合成与巡检记账为 system。
fn audit_source(source: TelemetrySource) -> EventSource {
    match source {
        TelemetrySource::Bus => EventSource::Backend,
        TelemetrySource::Mock => EventSource::System,
    }
}

fn merge_contents(tank: &mut Tank, grape: String) {
    match tank.contents.take() {
        // 部分更新只替换主描述符，年份/体积/备注原样保留
        Some(mut contents) => {
            contents.grape = grape;
            tank.contents = Some(contents);
        }
        None => {
            tank.contents = Some(TankContents {
                grape,
                vintage: None,
                volume_liters: None,
                notes: None,
            });
        }
    }
}

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}
