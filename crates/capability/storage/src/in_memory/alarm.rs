//! 告警台账内存存储实现

use crate::error::StorageError;
use crate::traits::AlarmStore;
use domain::Alarm;
use std::sync::RwLock;

/// 告警内存存储（新告警插入队首）。
pub struct InMemoryAlarmStore {
    alarms: RwLock<Vec<Alarm>>,
}

impl InMemoryAlarmStore {
    pub fn new() -> Self {
        Self {
            alarms: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAlarmStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AlarmStore for InMemoryAlarmStore {
    async fn list(&self) -> Result<Vec<Alarm>, StorageError> {
        let alarms = self
            .alarms
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(alarms.clone())
    }

    async fn add(&self, alarm: Alarm) -> Result<Alarm, StorageError> {
        let mut alarms = self
            .alarms
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        alarms.insert(0, alarm.clone());
        Ok(alarm)
    }

    async fn acknowledge(&self, alarm_id: &str) -> Result<Option<Alarm>, StorageError> {
        let mut alarms = self
            .alarms
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let alarm = match alarms.iter_mut().find(|alarm| alarm.id == alarm_id) {
            Some(alarm) => alarm,
            None => return Ok(None),
        };
        alarm.acknowledged = true;
        Ok(Some(alarm.clone()))
    }
}
