//! PostgreSQL 存储实现
//!
//! 仅承担审计事件的长期镜像：主链路始终走内存注册表，
//! Postgres 写入失败不回滚任何状态（尽力而为）。

mod event;

pub use event::PgEventLogStore;
