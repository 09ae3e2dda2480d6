//! 运行设置内存存储实现

use crate::error::StorageError;
use crate::models::SettingsUpdate;
use crate::traits::SettingsStore;
use domain::Settings;
use std::sync::RwLock;

/// 运行设置内存存储（整体按子对象合并更新）。
pub struct InMemorySettingsStore {
    settings: RwLock<Settings>,
}

impl InMemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: RwLock::new(initial),
        }
    }
}

#[async_trait::async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self) -> Result<Settings, StorageError> {
        let settings = self
            .settings
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(settings.clone())
    }

    async fn update(&self, update: SettingsUpdate) -> Result<Settings, StorageError> {
        let mut settings = self
            .settings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(thresholds) = update.alarm_thresholds {
            if let Some(high) = thresholds.high {
                settings.alarm_thresholds.high = high;
            }
            if let Some(low) = thresholds.low {
                settings.alarm_thresholds.low = low;
            }
        }
        if let Some(preferences) = update.preferences {
            if let Some(locale) = preferences.locale {
                settings.preferences.locale = locale;
            }
            if let Some(unit) = preferences.temperature_unit {
                settings.preferences.temperature_unit = unit;
            }
            if let Some(theme) = preferences.theme {
                settings.preferences.theme = theme;
            }
        }
        if let Some(bus) = update.bus {
            if let Some(url) = bus.url {
                settings.bus.url = Some(url);
            }
            if let Some(username) = bus.username {
                settings.bus.username = Some(username);
            }
            if let Some(password) = bus.password {
                settings.bus.password = Some(password);
            }
            if let Some(reconnect) = bus.reconnect_seconds {
                settings.bus.reconnect_seconds = reconnect;
            }
            if let Some(mock) = bus.mock_enabled {
                settings.bus.mock_enabled = mock;
            }
        }
        Ok(settings.clone())
    }
}
