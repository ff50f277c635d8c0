//! 答辩时段存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::orals::Column;
use crate::entity::prelude::*;
use crate::entity::project_groups::Column as GroupColumn;
use crate::errors::{PampError, Result};
use crate::models::orals::{
    entities::Oral,
    requests::{CreateOralRequest, UpdateOralRequest, ensure_time_range},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

fn oral_not_found(oral_id: Uuid) -> PampError {
    PampError::not_found(format!("Oral '{oral_id}' not found"))
}

async fn find_oral<C: ConnectionTrait>(conn: &C, oral_id: Uuid) -> Result<OralModel> {
    Orals::find_by_id(oral_id)
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询答辩失败: {e}")))?
        .ok_or_else(|| oral_not_found(oral_id))
}

async fn group_name<C: ConnectionTrait>(conn: &C, group_id: Uuid) -> Result<String> {
    Ok(ProjectGroups::find_by_id(group_id)
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?
        .map(|g| g.name)
        .unwrap_or_default())
}

/// 删除项目下全部答辩
pub(super) async fn delete_project_orals<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<()> {
    Orals::delete_many()
        .filter(Column::ProjectId.eq(project_id))
        .exec(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("删除答辩失败: {e}")))?;
    Ok(())
}

/// 删除分组的答辩
pub(super) async fn delete_group_oral<C: ConnectionTrait>(conn: &C, group_id: Uuid) -> Result<()> {
    Orals::delete_many()
        .filter(Column::GroupId.eq(group_id))
        .exec(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("删除答辩失败: {e}")))?;
    Ok(())
}

impl SeaOrmStorage {
    /// 为分组安排答辩；每个分组只能有一个
    pub async fn create_oral_impl(&self, req: CreateOralRequest) -> Result<Oral> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let group = ProjectGroups::find_by_id(req.group_id)
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?
            .ok_or_else(|| PampError::not_found(format!("Group '{}' not found", req.group_id)))?;

        let existing = Orals::find()
            .filter(Column::GroupId.eq(group.id))
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询答辩失败: {e}")))?;
        if existing.is_some() {
            return Err(PampError::bad_request(format!(
                "There is already an oral for {}",
                group.name
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let oral = OralActiveModel {
            id: Set(Uuid::new_v4()),
            group_id: Set(group.id),
            project_id: Set(group.project_id),
            start_time: Set(req.start_time.timestamp()),
            end_time: Set(req.end_time.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| PampError::database_operation(format!("创建答辩失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Oral {} scheduled for group {}", oral.id, group.id);
        Ok(oral.into_oral(group.name))
    }

    /// 获取答辩
    pub async fn get_oral_impl(&self, oral_id: Uuid) -> Result<Option<Oral>> {
        let oral = Orals::find_by_id(oral_id)
            .one(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询答辩失败: {e}")))?;

        match oral {
            Some(oral) => {
                let name = group_name(&self.db, oral.group_id).await?;
                Ok(Some(oral.into_oral(name)))
            }
            None => Ok(None),
        }
    }

    /// 按开始时间列出项目的全部答辩
    pub async fn list_project_orals_impl(&self, project_id: Uuid) -> Result<Vec<Oral>> {
        Projects::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询项目失败: {e}")))?
            .ok_or_else(|| PampError::not_found(format!("Project '{project_id}' not found")))?;

        let orals = Orals::find()
            .filter(Column::ProjectId.eq(project_id))
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询答辩失败: {e}")))?;

        let names: HashMap<Uuid, String> = ProjectGroups::find()
            .filter(GroupColumn::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        Ok(orals
            .into_iter()
            .map(|oral| {
                let name = names.get(&oral.group_id).cloned().unwrap_or_default();
                oral.into_oral(name)
            })
            .collect())
    }

    /// 调整答辩时段
    pub async fn update_oral_impl(&self, oral_id: Uuid, req: UpdateOralRequest) -> Result<Oral> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let current = find_oral(&txn, oral_id).await?.into_oral(String::new());
        let start = req.start_time.unwrap_or(current.start_time);
        let end = req.end_time.unwrap_or(current.end_time);
        ensure_time_range(start, end)?;

        let updated = OralActiveModel {
            id: Set(oral_id),
            start_time: Set(start.timestamp()),
            end_time: Set(end.timestamp()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| PampError::database_operation(format!("更新答辩失败: {e}")))?;

        let name = group_name(&txn, updated.group_id).await?;
        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_oral(name))
    }

    /// 删除答辩
    pub async fn delete_oral_impl(&self, oral_id: Uuid) -> Result<()> {
        let oral = find_oral(&self.db, oral_id).await?;
        Orals::delete_by_id(oral.id)
            .exec(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("删除答辩失败: {e}")))?;

        info!("Oral {} deleted", oral_id);
        Ok(())
    }
}
