//! Postgres 审计事件实现
//!
//! 表结构（由部署侧迁移创建）：
//!
//! ```sql
//! create table events (
//!     event_id   text primary key,
//!     tank_index bigint,
//!     category   text not null,
//!     source     text not null,
//!     summary    text not null,
//!     details    text,
//!     metadata   text,
//!     ts         timestamptz not null
//! );
//! ```

use crate::error::StorageError;
use crate::traits::EventLogStore;
use domain::{EventCategory, EventRecord, EventSource};
use sqlx::{PgPool, Row};

pub struct PgEventLogStore {
    pool: PgPool,
}

impl PgEventLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EventLogStore for PgEventLogStore {
    async fn append(&self, event: EventRecord) -> Result<(), StorageError> {
        sqlx::query(
            "insert into events \
             (event_id, tank_index, category, source, summary, details, metadata, ts) \
             values ($1, $2, $3, $4, $5, $6, $7, to_timestamp($8 / 1000.0)) \
             on conflict (event_id) do nothing",
        )
        .bind(&event.id)
        .bind(event.tank_index.map(|index| index as i64))
        .bind(event.category.as_str())
        .bind(event.source.as_str())
        .bind(&event.summary)
        .bind(&event.details)
        .bind(&event.metadata)
        .bind(event.ts_ms as f64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<EventRecord>, StorageError> {
        let rows = sqlx::query(
            "select event_id, tank_index, category, source, summary, details, metadata, \
             (extract(epoch from ts) * 1000)::bigint as ts_ms \
             from events \
             order by ts desc \
             limit $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let category: String = row.try_get("category")?;
            let source: String = row.try_get("source")?;
            let tank_index: Option<i64> = row.try_get("tank_index")?;
            items.push(EventRecord {
                id: row.try_get("event_id")?,
                ts_ms: row.try_get("ts_ms")?,
                tank_index: tank_index.and_then(|index| u32::try_from(index).ok()),
                category: EventCategory::parse(&category).unwrap_or(EventCategory::Telemetry),
                source: EventSource::parse(&source).unwrap_or(EventSource::System),
                summary: row.try_get("summary")?,
                details: row.try_get("details")?,
                metadata: row.try_get("metadata")?,
            });
        }
        Ok(items)
    }
}
