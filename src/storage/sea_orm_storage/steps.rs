//! 项目阶段存储操作

use std::collections::HashSet;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::steps::Column;
use crate::errors::{PampError, Result};
use crate::models::steps::{entities::Step, requests::UpsertStepsRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

/// 项目阶段（按 position 排序）
pub(super) async fn load_steps<C: ConnectionTrait>(conn: &C, project_id: Uuid) -> Result<Vec<Step>> {
    Ok(Steps::find()
        .filter(Column::ProjectId.eq(project_id))
        .order_by_asc(Column::Position)
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询项目阶段失败: {e}")))?
        .into_iter()
        .map(|s| s.into_step())
        .collect())
}

/// 把一个项目的阶段复制到另一个项目
pub(super) async fn copy_steps<C: ConnectionTrait>(
    conn: &C,
    from_project: Uuid,
    to_project: Uuid,
) -> Result<Vec<Step>> {
    let source = Steps::find()
        .filter(Column::ProjectId.eq(from_project))
        .order_by_asc(Column::Position)
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询项目阶段失败: {e}")))?;

    let now = chrono::Utc::now().timestamp();
    let mut copied = Vec::with_capacity(source.len());
    for step in source {
        let model = StepActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(to_project),
            name: Set(step.name),
            description: Set(step.description),
            has_mandatory_submission: Set(step.has_mandatory_submission),
            allow_submitting_after_deadline: Set(step.allow_submitting_after_deadline),
            submission_deadline: Set(step.submission_deadline),
            position: Set(step.position),
            created_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("复制项目阶段失败: {e}")))?;
        copied.push(model.into_step());
    }
    Ok(copied)
}

impl SeaOrmStorage {
    /// 整体提交项目阶段
    ///
    /// 带 id 的阶段就地更新，不带 id 的新建，未出现在请求中的阶段删除。
    /// 阶段顺序即请求中的顺序。
    pub async fn upsert_project_steps_impl(
        &self,
        project_id: Uuid,
        req: UpsertStepsRequest,
    ) -> Result<Vec<Step>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        Projects::find_by_id(project_id)
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询项目失败: {e}")))?
            .ok_or_else(|| PampError::not_found(format!("Project '{project_id}' not found")))?;

        let existing: HashSet<Uuid> = Steps::find()
            .filter(Column::ProjectId.eq(project_id))
            .all(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询项目阶段失败: {e}")))?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let kept: HashSet<Uuid> = req.steps.iter().filter_map(|s| s.id).collect();
        if let Some(unknown) = kept.iter().find(|id| !existing.contains(id)) {
            return Err(PampError::not_found(format!(
                "Step '{unknown}' not found in project '{project_id}'"
            )));
        }

        let removed: Vec<Uuid> = existing.difference(&kept).copied().collect();
        if !removed.is_empty() {
            Steps::delete_many()
                .filter(Column::Id.is_in(removed))
                .exec(&txn)
                .await
                .map_err(|e| PampError::database_operation(format!("删除项目阶段失败: {e}")))?;
        }

        let now = chrono::Utc::now().timestamp();
        for (position, step) in req.steps.into_iter().enumerate() {
            let deadline = step.submission_deadline.map(|d| d.timestamp());
            match step.id {
                Some(id) => {
                    StepActiveModel {
                        id: Set(id),
                        name: Set(step.name.trim().to_string()),
                        description: Set(step.description),
                        has_mandatory_submission: Set(step.has_mandatory_submission),
                        allow_submitting_after_deadline: Set(step.allow_submitting_after_deadline),
                        submission_deadline: Set(deadline),
                        position: Set(position as i32),
                        ..Default::default()
                    }
                    .update(&txn)
                    .await
                    .map_err(|e| PampError::database_operation(format!("更新项目阶段失败: {e}")))?;
                }
                None => {
                    StepActiveModel {
                        id: Set(Uuid::new_v4()),
                        project_id: Set(project_id),
                        name: Set(step.name.trim().to_string()),
                        description: Set(step.description),
                        has_mandatory_submission: Set(step.has_mandatory_submission),
                        allow_submitting_after_deadline: Set(step.allow_submitting_after_deadline),
                        submission_deadline: Set(deadline),
                        position: Set(position as i32),
                        created_at: Set(now),
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| PampError::database_operation(format!("创建项目阶段失败: {e}")))?;
                }
            }
        }

        let steps = load_steps(&txn, project_id).await?;
        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        debug!("Project {} now has {} steps", project_id, steps.len());
        Ok(steps)
    }
}
