//! 设备在线状态监控
//!
//! 心跳登记 + 周期巡检：配置中的储罐在超时窗口内没有任何遥测时，
//! 通过共享的遥测应用路径置为 offline —— 离线迁移与普通遥测一样
//! 可审计、可扇出。已经 offline 的储罐不会被重复标记。

use crate::GatewayShared;
use crate::decode::TankUpdate;
use cuverie_storage::{FacilityStore, StorageError, TankStore};
use domain::{TankStatus, TelemetrySource, configured_indices};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

/// 每个储罐 index 最近一次遥测解码时间。
pub struct Heartbeats {
    inner: Mutex<HashMap<u32, Instant>>,
}

impl Heartbeats {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn touch(&self, index: u32) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(index, Instant::now());
        }
    }

    pub fn last(&self, index: u32) -> Option<Instant> {
        self.inner.lock().ok().and_then(|map| map.get(&index).copied())
    }
}

impl Default for Heartbeats {
    fn default() -> Self {
        Self::new()
    }
}

/// 失活判定：从未有心跳，或最近心跳早于超时窗口。
pub fn is_stale(last: Option<Instant>, now: Instant, timeout: Duration) -> bool {
    match last {
        None => true,
        Some(at) => now.duration_since(at) > timeout,
    }
}

/// 单轮巡检：返回本轮被标记 offline 的储罐数。
pub(crate) async fn sweep_offline(shared: &GatewayShared) -> Result<usize, StorageError> {
    let _guard = shared.dispatch.lock().await;
    let facilities = shared.facilities.list().await?;
    let configured = configured_indices(&facilities);
    let now = Instant::now();
    let mut marked = 0;

    for tank in shared.tanks.list().await? {
        // 软删除的储罐已不在配置集合里，自然被跳过
        if !tank.is_visible(&configured) {
            continue;
        }
        if tank.status == TankStatus::Offline {
            continue;
        }
        if !is_stale(shared.heartbeats.last(tank.index), now, shared.offline_timeout) {
            continue;
        }
        let update = TankUpdate {
            status: Some(TankStatus::Offline),
            ..TankUpdate::default()
        };
        shared
            .apply_telemetry(tank.index, update, TelemetrySource::Bus)
            .await?;
        cuverie_telemetry::record_tank_marked_offline();
        marked += 1;
    }
    Ok(marked)
}

/// 周期巡检任务（仅 Live 模式运行）。
pub(crate) fn spawn_sweep(
    shared: std::sync::Arc<GatewayShared>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // interval 的首个 tick 立即到期，跳过使首轮巡检落在一个完整周期后
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match sweep_offline(&shared).await {
                Ok(0) => {}
                Ok(marked) => {
                    tracing::info!(target: "cuverie.gateway", marked, "tanks_marked_offline");
                }
                Err(err) => {
                    warn!(target: "cuverie.gateway", "offline sweep failed: {}", err);
                }
            }
        }
    })
}
