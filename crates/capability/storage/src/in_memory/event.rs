//! 审计事件内存存储实现
//!
//! 追加写环形缓冲：最多保留 `EVENT_LOG_CAP` 条，新在前。

use crate::error::StorageError;
use crate::models::EVENT_LOG_CAP;
use crate::traits::EventLogStore;
use domain::EventRecord;
use std::collections::VecDeque;
use std::sync::RwLock;

/// 审计事件内存存储。
pub struct InMemoryEventLogStore {
    events: RwLock<VecDeque<EventRecord>>,
}

impl InMemoryEventLogStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
        }
    }
}

impl Default for InMemoryEventLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EventLogStore for InMemoryEventLogStore {
    async fn append(&self, event: EventRecord) -> Result<(), StorageError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        events.push_front(event);
        events.truncate(EVENT_LOG_CAP);
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<EventRecord>, StorageError> {
        let events = self
            .events
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(events.iter().take(limit).cloned().collect())
    }
}
