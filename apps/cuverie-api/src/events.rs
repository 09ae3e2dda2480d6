//! 审计事件镜像
//!
//! 主存储始终是内存环形缓冲；配置了 Postgres 时每条事件异步镜像
//! 一份作为长期存储。镜像写入失败只记日志与指标，绝不回滚或阻塞
//! 触发它的状态变更；读取时优先 Postgres，失败回落内存。

use async_trait::async_trait;
use cuverie_storage::{EventLogStore, InMemoryEventLogStore, PgEventLogStore, StorageError};
use cuverie_telemetry::record_audit_append_failure;
use domain::EventRecord;
use std::sync::Arc;
use tracing::warn;

pub struct MirroredEventLog {
    primary: Arc<InMemoryEventLogStore>,
    mirror: Option<Arc<PgEventLogStore>>,
}

impl MirroredEventLog {
    pub fn new(primary: Arc<InMemoryEventLogStore>, mirror: Option<Arc<PgEventLogStore>>) -> Self {
        Self { primary, mirror }
    }
}

#[async_trait]
impl EventLogStore for MirroredEventLog {
    async fn append(&self, event: EventRecord) -> Result<(), StorageError> {
        self.primary.append(event.clone()).await?;
        if let Some(mirror) = self.mirror.clone() {
            tokio::spawn(async move {
                if let Err(err) = mirror.append(event).await {
                    record_audit_append_failure();
                    warn!(target: "cuverie.events", "postgres mirror append failed: {}", err);
                }
            });
        }
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<EventRecord>, StorageError> {
        if let Some(mirror) = self.mirror.as_ref() {
            match mirror.list(limit).await {
                Ok(items) => return Ok(items),
                Err(err) => {
                    warn!(target: "cuverie.events", "postgres read failed, falling back: {}", err);
                }
            }
        }
        self.primary.list(limit).await
    }
}
