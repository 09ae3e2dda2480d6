//! 配置对账引擎
//!
//! 将注册表收敛到最新配置快照：
//! 1. 快照内酒库整体 upsert（槽位集合整体替换）
//! 2. 槽位对应储罐 upsert：不存在则按默认状态创建，存在则更新
//!    名称/归属并清除软删除标记
//! 3. 归属该酒库但不在新槽位集合中的储罐软删除（offline + is_deleted）
//! 4. 快照中消失的酒库整体移除
//!
//! 对同一快照重复执行是幂等的：不产生重复创建或软删除抖动。

use cuverie_storage::{FacilityStore, ModeStore, StorageError, TankStore};
use domain::{FacilityConfig, GeneralMode, Tank, TankStatus};
use std::collections::HashSet;
use tracing::info;

/// 对账结果统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub created: usize,
    pub revived: usize,
    pub soft_deleted: usize,
    pub removed_facilities: usize,
}

pub async fn reconcile(
    tanks: &dyn TankStore,
    facilities: &dyn FacilityStore,
    modes: &dyn ModeStore,
    snapshot: &[FacilityConfig],
    now_ms: i64,
) -> Result<ReconcileOutcome, StorageError> {
    let existing: HashSet<String> = facilities
        .list()
        .await?
        .into_iter()
        .map(|facility| facility.id)
        .collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut outcome = ReconcileOutcome::default();

    for facility in snapshot {
        facilities.upsert(facility.clone()).await?;

        for slot in &facility.tanks {
            match tanks.get(slot.index).await? {
                None => {
                    tanks
                        .upsert(Tank::from_slot(&facility.id, slot, now_ms))
                        .await?;
                    outcome.created += 1;
                }
                Some(current) => {
                    if current.is_deleted {
                        outcome.revived += 1;
                    }
                    let name = slot.display_name.clone();
                    let id = slot.id.clone();
                    let facility_id = facility.id.clone();
                    tanks
                        .update(
                            slot.index,
                            Box::new(move |tank| {
                                tank.name = name;
                                tank.id = id;
                                tank.facility_id = Some(facility_id);
                                tank.is_deleted = false;
                                tank.last_updated_at_ms = now_ms;
                            }),
                        )
                        .await?;
                }
            }
        }

        // 步骤 3：软删除本酒库中被快照丢弃的储罐
        let slot_indices: HashSet<u32> =
            facility.tanks.iter().map(|slot| slot.index).collect();
        for tank in tanks.list().await? {
            if tank.facility_id.as_deref() != Some(facility.id.as_str()) {
                continue;
            }
            if slot_indices.contains(&tank.index) || tank.is_deleted {
                continue;
            }
            tanks
                .update(
                    tank.index,
                    Box::new(move |tank| {
                        tank.status = TankStatus::Offline;
                        tank.is_deleted = true;
                        tank.last_updated_at_ms = now_ms;
                    }),
                )
                .await?;
            outcome.soft_deleted += 1;
        }

        if modes.get(&facility.id).await?.is_none() {
            modes.set(&facility.id, GeneralMode::Stop).await?;
        }
        seen.insert(facility.id.clone());
    }

    // 步骤 4：移除快照中不再出现的酒库
    for facility_id in existing {
        if !seen.contains(&facility_id) {
            facilities.delete(&facility_id).await?;
            outcome.removed_facilities += 1;
        }
    }

    info!(
        target: "cuverie.gateway",
        facilities = snapshot.len(),
        created = outcome.created,
        revived = outcome.revived,
        soft_deleted = outcome.soft_deleted,
        removed = outcome.removed_facilities,
        "config_reconciled"
    );
    Ok(outcome)
}
