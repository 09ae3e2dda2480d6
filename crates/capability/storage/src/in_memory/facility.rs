//! 酒库配置与总体模式内存存储实现

use crate::error::StorageError;
use crate::traits::{FacilityStore, ModeStore};
use domain::{FacilityConfig, GeneralMode};
use std::collections::HashMap;
use std::sync::RwLock;

/// 酒库配置内存存储。
pub struct InMemoryFacilityStore {
    facilities: RwLock<HashMap<String, FacilityConfig>>,
}

impl InMemoryFacilityStore {
    pub fn new() -> Self {
        Self {
            facilities: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryFacilityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FacilityStore for InMemoryFacilityStore {
    async fn list(&self) -> Result<Vec<FacilityConfig>, StorageError> {
        let map = self
            .facilities
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items: Vec<FacilityConfig> = map.values().cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn get(&self, facility_id: &str) -> Result<Option<FacilityConfig>, StorageError> {
        let map = self
            .facilities
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(facility_id).cloned())
    }

    async fn upsert(&self, facility: FacilityConfig) -> Result<(), StorageError> {
        let mut map = self
            .facilities
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(facility.id.clone(), facility);
        Ok(())
    }

    async fn delete(&self, facility_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .facilities
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(facility_id).is_some())
    }
}

/// 酒库总体模式内存存储。
pub struct InMemoryModeStore {
    modes: RwLock<HashMap<String, GeneralMode>>,
}

impl InMemoryModeStore {
    pub fn new() -> Self {
        Self {
            modes: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryModeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ModeStore for InMemoryModeStore {
    async fn get(&self, facility_id: &str) -> Result<Option<GeneralMode>, StorageError> {
        let map = self
            .modes
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(facility_id).copied())
    }

    async fn set(&self, facility_id: &str, mode: GeneralMode) -> Result<(), StorageError> {
        let mut map = self
            .modes
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(facility_id.to_string(), mode);
        Ok(())
    }
}
