//! 储罐内存存储实现
//!
//! 功能：
//! - 按 index 的查找/列出/整体替换
//! - 单罐原子读-改-写（写锁内执行更新闭包）

use crate::error::StorageError;
use crate::traits::{TankMutator, TankStore};
use domain::Tank;
use std::collections::HashMap;
use std::sync::RwLock;

/// 储罐内存存储。
pub struct InMemoryTankStore {
    tanks: RwLock<HashMap<u32, Tank>>,
}

impl InMemoryTankStore {
    pub fn new() -> Self {
        Self {
            tanks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTankStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TankStore for InMemoryTankStore {
    async fn list(&self) -> Result<Vec<Tank>, StorageError> {
        let map = self
            .tanks
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items: Vec<Tank> = map.values().cloned().collect();
        items.sort_by_key(|tank| tank.index);
        Ok(items)
    }

    async fn get(&self, index: u32) -> Result<Option<Tank>, StorageError> {
        let map = self
            .tanks
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(&index).cloned())
    }

    async fn upsert(&self, tank: Tank) -> Result<(), StorageError> {
        let mut map = self
            .tanks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(tank.index, tank);
        Ok(())
    }

    async fn update(
        &self,
        index: u32,
        mutate: TankMutator<'_>,
    ) -> Result<Option<Tank>, StorageError> {
        let mut map = self
            .tanks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let tank = match map.get_mut(&index) {
            Some(tank) => tank,
            None => return Ok(None),
        };
        mutate(tank);
        Ok(Some(tank.clone()))
    }
}
