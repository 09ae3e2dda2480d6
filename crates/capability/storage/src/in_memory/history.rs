//! 温度历史内存存储实现
//!
//! 每罐一个有界环：追加超过 `HISTORY_CAP` 时丢弃最旧采样点。

use crate::error::StorageError;
use crate::models::HISTORY_CAP;
use crate::traits::HistoryStore;
use domain::TemperatureSample;
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

/// 温度历史内存存储。
pub struct InMemoryHistoryStore {
    samples: RwLock<HashMap<u32, VecDeque<TemperatureSample>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, index: u32, sample: TemperatureSample) -> Result<(), StorageError> {
        let mut map = self
            .samples
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let ring = map.entry(index).or_default();
        ring.push_back(sample);
        while ring.len() > HISTORY_CAP {
            ring.pop_front();
        }
        Ok(())
    }

    async fn list(
        &self,
        index: u32,
        limit: usize,
    ) -> Result<Vec<TemperatureSample>, StorageError> {
        let map = self
            .samples
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let ring = match map.get(&index) {
            Some(ring) => ring,
            None => return Ok(Vec::new()),
        };
        let skip = ring.len().saturating_sub(limit);
        Ok(ring.iter().skip(skip).cloned().collect())
    }
}
