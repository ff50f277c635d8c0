//! 学生批次存储操作

use super::SeaOrmStorage;
use crate::entity::batch_students::Column as RosterColumn;
use crate::entity::prelude::*;
use crate::entity::projects::Column as ProjectColumn;
use crate::entity::student_batches::Column;
use crate::errors::{PampError, Result};
use crate::models::student_batches::{
    entities::StudentBatch,
    requests::{CreateStudentBatchRequest, UpdateStudentBatchRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

fn batch_not_found(batch_id: Uuid) -> PampError {
    PampError::not_found(format!("Student batch '{batch_id}' not found"))
}

/// 批次的有序学生名单
pub(super) async fn load_roster<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Vec<Uuid>> {
    Ok(BatchStudents::find()
        .filter(RosterColumn::BatchId.eq(batch_id))
        .order_by_asc(RosterColumn::Position)
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询学生名单失败: {e}")))?
        .into_iter()
        .map(|s| s.student_id)
        .collect())
}

async fn write_roster<C: ConnectionTrait>(
    conn: &C,
    batch_id: Uuid,
    students: &[Uuid],
) -> Result<()> {
    for (position, student_id) in students.iter().enumerate() {
        BatchStudentActiveModel {
            batch_id: Set(batch_id),
            student_id: Set(*student_id),
            position: Set(position as i32),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("写入学生名单失败: {e}")))?;
    }
    Ok(())
}

async fn ensure_name_free<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<Uuid>,
) -> Result<()> {
    let mut select = StudentBatches::find().filter(Column::Name.eq(name));
    if let Some(id) = except {
        select = select.filter(Column::Id.ne(id));
    }
    let taken = select
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询学生批次失败: {e}")))?;
    if taken.is_some() {
        return Err(PampError::bad_request(format!(
            "A student batch named '{name}' already exists"
        )));
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建学生批次及名单
    pub async fn create_student_batch_impl(
        &self,
        req: CreateStudentBatchRequest,
    ) -> Result<StudentBatch> {
        let name = req.name.trim().to_string();
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        ensure_name_free(&txn, &name, None).await?;

        let batch = StudentBatchActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            state: Set(req.state.to_string()),
            tags: Set(req.tags),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| PampError::database_operation(format!("创建学生批次失败: {e}")))?;

        write_roster(&txn, batch.id, &req.students).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Student batch {} created with {} students",
            batch.id,
            req.students.len()
        );
        Ok(batch.into_batch(req.students))
    }

    /// 获取学生批次
    pub async fn get_student_batch_impl(&self, batch_id: Uuid) -> Result<Option<StudentBatch>> {
        let batch = StudentBatches::find_by_id(batch_id)
            .one(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询学生批次失败: {e}")))?;

        match batch {
            Some(batch) => {
                let students = load_roster(&self.db, batch.id).await?;
                Ok(Some(batch.into_batch(students)))
            }
            None => Ok(None),
        }
    }

    /// 修改学生批次；students 存在时整体替换名单
    pub async fn update_student_batch_impl(
        &self,
        batch_id: Uuid,
        req: UpdateStudentBatchRequest,
    ) -> Result<StudentBatch> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        StudentBatches::find_by_id(batch_id)
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询学生批次失败: {e}")))?
            .ok_or_else(|| batch_not_found(batch_id))?;

        let mut model = StudentBatchActiveModel {
            id: Set(batch_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(name) = req.name {
            let name = name.trim().to_string();
            ensure_name_free(&txn, &name, Some(batch_id)).await?;
            model.name = Set(name);
        }
        if let Some(state) = req.state {
            model.state = Set(state.to_string());
        }
        if let Some(tags) = req.tags {
            model.tags = Set(tags);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("更新学生批次失败: {e}")))?;

        if let Some(students) = req.students {
            BatchStudents::delete_many()
                .filter(RosterColumn::BatchId.eq(batch_id))
                .exec(&txn)
                .await
                .map_err(|e| PampError::database_operation(format!("删除学生名单失败: {e}")))?;
            write_roster(&txn, batch_id, &students).await?;
        }

        let students = load_roster(&txn, batch_id).await?;
        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_batch(students))
    }

    /// 删除学生批次；引用该批次的项目解除关联
    pub async fn delete_student_batch_impl(&self, batch_id: Uuid) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        StudentBatches::find_by_id(batch_id)
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询学生批次失败: {e}")))?
            .ok_or_else(|| batch_not_found(batch_id))?;

        Projects::update_many()
            .col_expr(ProjectColumn::StudentBatchId, Expr::value(Option::<Uuid>::None))
            .filter(ProjectColumn::StudentBatchId.eq(batch_id))
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("解除项目批次关联失败: {e}")))?;

        BatchStudents::delete_many()
            .filter(RosterColumn::BatchId.eq(batch_id))
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("删除学生名单失败: {e}")))?;

        StudentBatches::delete_by_id(batch_id)
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("删除学生批次失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Student batch {} deleted", batch_id);
        Ok(())
    }
}
