//! 存储接口 Trait 定义
//!
//! 定义注册表全部资源的异步接口：
//! - TankStore：储罐存储（按 index 原子读-改-写）
//! - HistoryStore：温度历史存储（环形淘汰）
//! - FacilityStore：酒库配置存储
//! - ModeStore：酒库总体模式存储
//! - AlarmStore：告警台账存储
//! - EventLogStore：审计事件存储（追加写）
//! - SettingsStore：运行设置存储
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发
//! - 网关不感知后端实现（内存与关系型可互换）

use crate::error::StorageError;
use crate::models::SettingsUpdate;
use async_trait::async_trait;
use domain::{
    Alarm, EventRecord, FacilityConfig, GeneralMode, Settings, Tank, TemperatureSample,
};

/// 储罐原子更新闭包。
pub type TankMutator<'a> = Box<dyn FnOnce(&mut Tank) + Send + 'a>;

/// 储罐存储接口。
#[async_trait]
pub trait TankStore: Send + Sync {
    /// 列出所有已知储罐（含软删除，筛选由调用方按可见性规则完成）
    async fn list(&self) -> Result<Vec<Tank>, StorageError>;

    /// 按 index 查找储罐
    async fn get(&self, index: u32) -> Result<Option<Tank>, StorageError>;

    /// 插入或整体替换储罐
    async fn upsert(&self, tank: Tank) -> Result<(), StorageError>;

    /// 对单个储罐做原子读-改-写；不存在时返回 None
    async fn update(&self, index: u32, mutate: TankMutator<'_>)
    -> Result<Option<Tank>, StorageError>;
}

/// 温度历史存储接口（每罐一个有界环）。
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 追加采样点，超出上限时丢弃最旧
    async fn append(&self, index: u32, sample: TemperatureSample) -> Result<(), StorageError>;

    /// 返回最近 `limit` 个采样点，旧在前
    async fn list(&self, index: u32, limit: usize)
    -> Result<Vec<TemperatureSample>, StorageError>;
}

/// 酒库配置存储接口。
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// 列出所有酒库（按 id 排序，保证事件载荷稳定）
    async fn list(&self) -> Result<Vec<FacilityConfig>, StorageError>;

    /// 查找指定酒库
    async fn get(&self, facility_id: &str) -> Result<Option<FacilityConfig>, StorageError>;

    /// 插入或整体替换酒库（槽位集合整体替换）
    async fn upsert(&self, facility: FacilityConfig) -> Result<(), StorageError>;

    /// 删除酒库
    async fn delete(&self, facility_id: &str) -> Result<bool, StorageError>;
}

/// 酒库总体模式存储接口。
#[async_trait]
pub trait ModeStore: Send + Sync {
    async fn get(&self, facility_id: &str) -> Result<Option<GeneralMode>, StorageError>;

    async fn set(&self, facility_id: &str, mode: GeneralMode) -> Result<(), StorageError>;
}

/// 告警台账存储接口。
#[async_trait]
pub trait AlarmStore: Send + Sync {
    /// 列出所有告警，新在前
    async fn list(&self) -> Result<Vec<Alarm>, StorageError>;

    /// 追加告警
    async fn add(&self, alarm: Alarm) -> Result<Alarm, StorageError>;

    /// 确认告警（false → true 单向迁移）；不存在时返回 None
    async fn acknowledge(&self, alarm_id: &str) -> Result<Option<Alarm>, StorageError>;
}

/// 审计事件存储接口（追加写）。
#[async_trait]
pub trait EventLogStore: Send + Sync {
    async fn append(&self, event: EventRecord) -> Result<(), StorageError>;

    /// 返回最近 `limit` 条事件，新在前
    async fn list(&self, limit: usize) -> Result<Vec<EventRecord>, StorageError>;
}

/// 运行设置存储接口。
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self) -> Result<Settings, StorageError>;

    /// 按子对象合并更新，返回合并后的完整设置
    async fn update(&self, update: SettingsUpdate) -> Result<Settings, StorageError>;
}
