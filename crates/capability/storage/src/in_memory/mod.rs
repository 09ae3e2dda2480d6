//! 内存存储实现
//!
//! 使用 RwLock + HashMap 提供线程安全的内存存储，作为运行时默认注册表，
//! 也是测试与演示的固定装置。

mod alarm;
mod event;
mod facility;
mod history;
mod seed;
mod settings;
mod tank;

pub use alarm::InMemoryAlarmStore;
pub use event::InMemoryEventLogStore;
pub use facility::{InMemoryFacilityStore, InMemoryModeStore};
pub use history::InMemoryHistoryStore;
pub use seed::seed_demo_fleet;
pub use settings::InMemorySettingsStore;
pub use tank::InMemoryTankStore;
