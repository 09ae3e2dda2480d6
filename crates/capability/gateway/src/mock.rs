//! 合成遥测生成器（Mock 模式）
//!
//! 固定间隔从当前可见储罐中随机挑一个，合成一条近似真实的温度读数，
//! 走与 Live 模式完全相同的遥测应用路径 —— 下游消费者在两种模式下
//! 看到的事件形态一致，只有 source 标记不同。

use crate::GatewayShared;
use crate::decode::TankUpdate;
use cuverie_storage::{FacilityStore, TankStore};
use domain::{TelemetrySource, configured_indices};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub(crate) fn spawn_generator(
    shared: Arc<GatewayShared>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(err) = tick(&shared).await {
                warn!(target: "cuverie.gateway", "mock telemetry tick failed: {}", err);
            }
        }
    })
}

async fn tick(shared: &GatewayShared) -> Result<(), cuverie_storage::StorageError> {
    let _guard = shared.dispatch.lock().await;
    let facilities = shared.facilities.list().await?;
    let configured = configured_indices(&facilities);
    let visible: Vec<u32> = shared
        .tanks
        .list()
        .await?
        .into_iter()
        .filter(|tank| tank.is_visible(&configured))
        .map(|tank| tank.index)
        .collect();
    if visible.is_empty() {
        return Ok(());
    }

    // ThreadRng 不是 Send，取值后立刻释放再跨 await
    let (index, temperature) = {
        let mut rng = rand::thread_rng();
        let index = visible[rng.gen_range(0..visible.len())];
        let base = 20.0 + rng.r#gen::<f64>() * 5.0;
        let raw = base + rng.r#gen::<f64>() - 0.5;
        (index, (raw * 100.0).round() / 100.0)
    };

    cuverie_telemetry::record_mock_tick();
    let update = TankUpdate {
        temperature: Some(temperature),
        ..TankUpdate::default()
    };
    shared
        .apply_telemetry(index, update, TelemetrySource::Mock)
        .await?;
    Ok(())
}
