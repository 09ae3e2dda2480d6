//! Handlers 模块

pub mod alarms;
pub mod cuveries;
pub mod events;
pub mod gateway;
pub mod metrics;
pub mod realtime;
pub mod settings;
pub mod tanks;

pub use alarms::*;
pub use cuveries::*;
pub use events::*;
pub use gateway::*;
pub use metrics::*;
pub use realtime::*;
pub use settings::*;
pub use tanks::*;

use crate::AppState;
use crate::utils::now_epoch_ms;
use cuverie_storage::{EventLogStore, FacilityStore, StorageError, TankStore};
use domain::{EventCategory, EventRecord, EventSource, Tank, configured_indices};
use tracing::warn;

/// 可见储罐列表：未软删除且属于当前配置集合（唯一可见性规则）。
pub(crate) async fn visible_tanks(state: &AppState) -> Result<Vec<Tank>, StorageError> {
    let facilities = state.facilities.list().await?;
    let configured = configured_indices(&facilities);
    Ok(state
        .tanks
        .list()
        .await?
        .into_iter()
        .filter(|tank| tank.is_visible(&configured))
        .collect())
}

/// 追加一条用户命令审计事件（尽力而为）。
pub(crate) async fn append_command_event(
    state: &AppState,
    tank_index: Option<u32>,
    summary: String,
    metadata: Option<String>,
) {
    let event = EventRecord {
        id: format!("command-{}", uuid::Uuid::new_v4()),
        ts_ms: now_epoch_ms(),
        tank_index,
        category: EventCategory::Command,
        source: EventSource::User,
        summary,
        details: None,
        metadata,
    };
    if let Err(err) = state.events.append(event).await {
        warn!(target: "cuverie.api", "command audit append failed: {}", err);
    }
}
