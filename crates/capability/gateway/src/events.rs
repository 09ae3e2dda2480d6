//! 派生事件扇出
//!
//! 网关对内部订阅方（推送层、持久化镜像）暴露两类事件流：
//! - 遥测已应用：携带完整更新后的储罐与来源标记
//! - 配置已变更：携带附带模式的完整酒库列表
//!
//! 使用 tokio broadcast：接收端 drop 即确定性退订。

use domain::{FacilityWithMode, Tank, TelemetrySource};
use tokio::sync::broadcast;

/// 遥测已应用事件。
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    pub tank: Tank,
    pub source: TelemetrySource,
}

/// 配置已变更事件。
#[derive(Debug, Clone)]
pub struct ConfigEvent {
    pub facilities: Vec<FacilityWithMode>,
}

/// 网关事件扇出通道。
pub struct Fanout {
    telemetry: broadcast::Sender<TelemetryEvent>,
    config: broadcast::Sender<ConfigEvent>,
}

impl Fanout {
    pub fn new() -> Self {
        let (telemetry, _) = broadcast::channel(256);
        let (config, _) = broadcast::channel(64);
        Self { telemetry, config }
    }

    /// 订阅遥测事件流。
    pub fn on_telemetry(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.telemetry.subscribe()
    }

    /// 订阅配置变更事件流。
    pub fn on_config(&self) -> broadcast::Receiver<ConfigEvent> {
        self.config.subscribe()
    }

    /// 发送失败只说明当前没有订阅者，不是错误。
    pub(crate) fn emit_telemetry(&self, event: TelemetryEvent) {
        let _ = self.telemetry.send(event);
    }

    pub(crate) fn emit_config(&self, event: ConfigEvent) {
        let _ = self.config.send(event);
    }
}

impl Default for Fanout {
    fn default() -> Self {
        Self::new()
    }
}
