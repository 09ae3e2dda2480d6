//! # 注册表存储模块
//!
//! 提供储罐/酒库注册表的统一存储抽象层：
//!
//! 1. **接口抽象层** (`traits.rs`)：全部资源存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：更新输入结构与容量常量
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **连接管理层** (`connection.rs`)：PostgreSQL 连接池管理
//! 5. **实现层**：
//!    - `in_memory/`：内存实现（运行时默认，也用于测试）
//!    - `postgres/`：PostgreSQL 事件日志镜像（尽力而为的长期存储）
//!
//! ## 原子性约定
//!
//! 每个键（单储罐/单酒库）的读-改-写在存储内部原子完成；遥测、命令与
//! 对账可能并发命中同一储罐，存储就是锁边界。

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

pub use connection::connect_pool;
pub use error::StorageError;
pub use models::{
    AlarmThresholdsUpdate, BusSettingsUpdate, EVENT_LOG_CAP, HISTORY_CAP, SettingsUpdate,
    UserPreferencesUpdate,
};
pub use in_memory::{
    InMemoryAlarmStore, InMemoryEventLogStore, InMemoryFacilityStore, InMemoryHistoryStore,
    InMemoryModeStore, InMemorySettingsStore, InMemoryTankStore, seed_demo_fleet,
};
pub use postgres::PgEventLogStore;
pub use traits::{
    AlarmStore, EventLogStore, FacilityStore, HistoryStore, ModeStore, SettingsStore, TankMutator,
    TankStore,
};
