//! 评分表存储操作
//!
//! 评分表只有两个状态：草稿与已确认。所有修改评分表内容的操作都必须先通过
//! [`load_draft_scale`] 拿到 [`DraftScale`]，已确认的评分表拿不到它，
//! 因而无法被修改。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::grading_criteria::Column as CriterionColumn;
use crate::entity::grading_results::Column as ResultColumn;
use crate::entity::grading_scales::Column as ScaleColumn;
use crate::entity::prelude::*;
use crate::errors::{PampError, Result};
use crate::models::grading::{
    entities::{GradingCriterion, GradingResult, GradingScale, ResultTarget, ScaleState},
    requests::{
        CreateGradingCriterionRequest, CreateGradingResultsRequest, CreateGradingScaleRequest,
        GradingScaleQuery, UpdateGradingCriterionRequest, UpdateGradingResultRequest,
        UpdateGradingScaleRequest,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

/// 处于草稿状态的评分表
pub(super) struct DraftScale(GradingScaleModel);

impl DraftScale {
    pub(super) fn id(&self) -> Uuid {
        self.0.id
    }
}

fn scale_not_found(scale_id: Uuid) -> PampError {
    PampError::not_found(format!("Grading scale '{scale_id}' not found"))
}

async fn find_scale<C: ConnectionTrait>(conn: &C, scale_id: Uuid) -> Result<GradingScaleModel> {
    GradingScales::find_by_id(scale_id)
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询评分表失败: {e}")))?
        .ok_or_else(|| scale_not_found(scale_id))
}

/// 加载草稿评分表；不存在返回 NotFound，已确认返回 Forbidden
pub(super) async fn load_draft_scale<C: ConnectionTrait>(
    conn: &C,
    scale_id: Uuid,
) -> Result<DraftScale> {
    let scale = find_scale(conn, scale_id).await?;
    match scale.state() {
        ScaleState::Draft => Ok(DraftScale(scale)),
        ScaleState::Validated { .. } => Err(PampError::forbidden(format!(
            "Grading scale '{scale_id}' is validated and can no longer be modified"
        ))),
    }
}

async fn find_criterion<C: ConnectionTrait>(
    conn: &C,
    criterion_id: Uuid,
) -> Result<GradingCriterionModel> {
    GradingCriteria::find_by_id(criterion_id)
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询评分标准失败: {e}")))?
        .ok_or_else(|| PampError::not_found(format!("Grading criterion '{criterion_id}' not found")))
}

async fn insert_criterion<C: ConnectionTrait>(
    conn: &C,
    scale: &DraftScale,
    req: CreateGradingCriterionRequest,
    position: i32,
) -> Result<GradingCriterionModel> {
    GradingCriterionActiveModel {
        id: Set(Uuid::new_v4()),
        scale_id: Set(scale.id()),
        label: Set(req.label.trim().to_string()),
        max_points: Set(req.max_points),
        weight: Set(req.weight),
        comment_enabled: Set(req.comment_enabled),
        position: Set(position),
    }
    .insert(conn)
    .await
    .map_err(|e| PampError::database_operation(format!("创建评分标准失败: {e}")))
}

async fn touch_scale<C: ConnectionTrait>(conn: &C, scale: &DraftScale) -> Result<()> {
    GradingScaleActiveModel {
        id: Set(scale.id()),
        updated_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    }
    .update(conn)
    .await
    .map_err(|e| PampError::database_operation(format!("更新评分表失败: {e}")))?;
    Ok(())
}

/// 删除若干评分标准下的全部结果
async fn delete_results_of<C: ConnectionTrait>(conn: &C, criterion_ids: Vec<Uuid>) -> Result<()> {
    if criterion_ids.is_empty() {
        return Ok(());
    }
    GradingResults::delete_many()
        .filter(ResultColumn::CriterionId.is_in(criterion_ids))
        .exec(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("删除评分结果失败: {e}")))?;
    Ok(())
}

/// 加载评分表下所有评分标准及其结果
async fn load_criteria<C: ConnectionTrait>(
    conn: &C,
    scale_id: Uuid,
) -> Result<Vec<GradingCriterion>> {
    let criteria = GradingCriteria::find()
        .filter(CriterionColumn::ScaleId.eq(scale_id))
        .order_by_asc(CriterionColumn::Position)
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询评分标准失败: {e}")))?;

    if criteria.is_empty() {
        return Ok(Vec::new());
    }

    let mut results: HashMap<Uuid, Vec<GradingResult>> = HashMap::new();
    for result in GradingResults::find()
        .filter(ResultColumn::CriterionId.is_in(criteria.iter().map(|c| c.id)))
        .order_by_asc(ResultColumn::CreatedAt)
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询评分结果失败: {e}")))?
    {
        results
            .entry(result.criterion_id)
            .or_default()
            .push(result.into_result());
    }

    Ok(criteria
        .into_iter()
        .map(|c| {
            let own = results.remove(&c.id).unwrap_or_default();
            c.into_criterion(own)
        })
        .collect())
}

async fn hydrate<C: ConnectionTrait>(conn: &C, scale: GradingScaleModel) -> Result<GradingScale> {
    let criteria = load_criteria(conn, scale.id).await?;
    Ok(scale.into_grading_scale(criteria))
}

impl SeaOrmStorage {
    /// 创建评分表，评分标准在同一事务内写入
    pub async fn create_grading_scale_impl(
        &self,
        req: CreateGradingScaleRequest,
        created_by: Uuid,
    ) -> Result<GradingScale> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let scale = GradingScaleActiveModel {
            id: Set(Uuid::new_v4()),
            scale_type: Set(req.scale_type.to_string()),
            target_id: Set(req.target_id),
            notation_mode: Set(req.notation_mode.to_string()),
            title: Set(req.title.trim().to_string()),
            is_validated: Set(false),
            validated_at: Set(None),
            created_by: Set(created_by),
            project_id: Set(req.project_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| PampError::database_operation(format!("创建评分表失败: {e}")))?;

        let draft = DraftScale(scale);
        for (position, criterion) in req.criteria.into_iter().enumerate() {
            insert_criterion(&txn, &draft, criterion, position as i32).await?;
        }

        let scale = hydrate(&txn, draft.0).await?;
        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Grading scale {} created with {} criteria",
            scale.id,
            scale.criteria.len()
        );
        Ok(scale)
    }

    /// 获取评分表（含评分标准与结果）
    pub async fn get_grading_scale_impl(&self, scale_id: Uuid) -> Result<Option<GradingScale>> {
        let scale = GradingScales::find_by_id(scale_id)
            .one(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询评分表失败: {e}")))?;

        match scale {
            Some(scale) => Ok(Some(hydrate(&self.db, scale).await?)),
            None => Ok(None),
        }
    }

    /// 修改评分表标题
    pub async fn update_grading_scale_impl(
        &self,
        scale_id: Uuid,
        req: UpdateGradingScaleRequest,
    ) -> Result<GradingScale> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let draft = load_draft_scale(&txn, scale_id).await?;

        let mut model = GradingScaleActiveModel {
            id: Set(draft.id()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = req.title {
            model.title = Set(title.trim().to_string());
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("更新评分表失败: {e}")))?;
        let scale = hydrate(&txn, updated).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(scale)
    }

    /// 删除评分表，结果、标准与评分表在同一事务内删除
    pub async fn delete_grading_scale_impl(&self, scale_id: Uuid) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let draft = load_draft_scale(&txn, scale_id).await?;
        delete_scales(&txn, vec![draft.id()]).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Grading scale {} deleted", scale_id);
        Ok(())
    }

    /// 确认评分表
    ///
    /// 依次检查：未确认、至少一个评分标准、每个标准至少一条结果。
    /// 最终写入带 `is_validated = false` 条件，并发确认只有一个能成功。
    pub async fn validate_grading_scale_impl(&self, scale_id: Uuid) -> Result<GradingScale> {
        let scale = find_scale(&self.db, scale_id).await?;
        if scale.state().is_validated() {
            return Err(PampError::bad_request("Grading scale is already validated"));
        }

        let criteria = GradingCriteria::find()
            .filter(CriterionColumn::ScaleId.eq(scale_id))
            .order_by_asc(CriterionColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询评分标准失败: {e}")))?;

        if criteria.is_empty() {
            return Err(PampError::bad_request(
                "Cannot validate a grading scale without criteria",
            ));
        }

        for criterion in &criteria {
            let graded = GradingResults::find()
                .filter(ResultColumn::CriterionId.eq(criterion.id))
                .count(&self.db)
                .await
                .map_err(|e| PampError::database_operation(format!("查询评分结果失败: {e}")))?;
            if graded == 0 {
                return Err(PampError::bad_request(format!(
                    "Criterion '{}' has no results yet",
                    criterion.label
                )));
            }
        }

        let now = chrono::Utc::now().timestamp();
        let outcome = GradingScales::update_many()
            .col_expr(ScaleColumn::IsValidated, Expr::value(true))
            .col_expr(ScaleColumn::ValidatedAt, Expr::value(Some(now)))
            .col_expr(ScaleColumn::UpdatedAt, Expr::value(now))
            .filter(ScaleColumn::Id.eq(scale_id))
            .filter(ScaleColumn::IsValidated.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("确认评分表失败: {e}")))?;

        if outcome.rows_affected == 0 {
            return Err(PampError::bad_request("Grading scale is already validated"));
        }

        info!("Grading scale {} validated", scale_id);
        let scale = find_scale(&self.db, scale_id).await?;
        hydrate(&self.db, scale).await
    }

    /// 按项目列出评分表，可按类型与评分对象过滤
    pub async fn list_project_grading_scales_impl(
        &self,
        project_id: Uuid,
        query: GradingScaleQuery,
    ) -> Result<Vec<GradingScale>> {
        let mut select = GradingScales::find().filter(ScaleColumn::ProjectId.eq(project_id));

        if let Some(scale_type) = query.scale_type {
            select = select.filter(ScaleColumn::ScaleType.eq(scale_type.to_string()));
        }
        if let Some(target_id) = query.target_id {
            select = select.filter(ScaleColumn::TargetId.eq(target_id));
        }

        let scales = select
            .order_by_asc(ScaleColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询评分表列表失败: {e}")))?;

        let mut hydrated = Vec::with_capacity(scales.len());
        for scale in scales {
            hydrated.push(hydrate(&self.db, scale).await?);
        }
        Ok(hydrated)
    }

    /// 追加评分标准，排在现有标准之后
    pub async fn add_grading_criterion_impl(
        &self,
        scale_id: Uuid,
        req: CreateGradingCriterionRequest,
    ) -> Result<GradingCriterion> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let draft = load_draft_scale(&txn, scale_id).await?;
        let position = GradingCriteria::find()
            .filter(CriterionColumn::ScaleId.eq(draft.id()))
            .order_by_desc(CriterionColumn::Position)
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询评分标准失败: {e}")))?
            .map_or(0, |last| last.position + 1);

        let criterion = insert_criterion(&txn, &draft, req, position).await?;
        touch_scale(&txn, &draft).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(criterion.into_criterion(Vec::new()))
    }

    /// 修改评分标准
    pub async fn update_grading_criterion_impl(
        &self,
        criterion_id: Uuid,
        req: UpdateGradingCriterionRequest,
    ) -> Result<GradingCriterion> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let criterion = find_criterion(&txn, criterion_id).await?;
        let draft = load_draft_scale(&txn, criterion.scale_id).await?;

        let mut model = GradingCriterionActiveModel {
            id: Set(criterion.id),
            ..Default::default()
        };
        if let Some(label) = req.label {
            model.label = Set(label.trim().to_string());
        }
        if let Some(max_points) = req.max_points {
            model.max_points = Set(max_points);
        }
        if let Some(weight) = req.weight {
            model.weight = Set(Some(weight));
        }
        if let Some(comment_enabled) = req.comment_enabled {
            model.comment_enabled = Set(comment_enabled);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("更新评分标准失败: {e}")))?;
        touch_scale(&txn, &draft).await?;

        let results = GradingResults::find()
            .filter(ResultColumn::CriterionId.eq(updated.id))
            .order_by_asc(ResultColumn::CreatedAt)
            .all(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询评分结果失败: {e}")))?
            .into_iter()
            .map(|r| r.into_result())
            .collect();

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_criterion(results))
    }

    /// 删除评分标准及其结果
    pub async fn delete_grading_criterion_impl(&self, criterion_id: Uuid) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let criterion = find_criterion(&txn, criterion_id).await?;
        let draft = load_draft_scale(&txn, criterion.scale_id).await?;

        delete_results_of(&txn, vec![criterion.id]).await?;
        GradingCriteria::delete_by_id(criterion.id)
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("删除评分标准失败: {e}")))?;
        touch_scale(&txn, &draft).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;
        Ok(())
    }

    /// 批量录入评分结果，任一条校验失败整批回滚
    pub async fn create_grading_results_impl(
        &self,
        scale_id: Uuid,
        req: CreateGradingResultsRequest,
        created_by: Uuid,
    ) -> Result<Vec<GradingResult>> {
        let target = req.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let draft = load_draft_scale(&txn, scale_id).await?;

        let notation_mode = draft.0.notation_mode.as_str();
        if target.notation_mode().to_string() != notation_mode {
            return Err(PampError::validation(format!(
                "Grading scale uses '{notation_mode}' notation, results must target a {}",
                match target {
                    ResultTarget::Group(_) => "student",
                    ResultTarget::Student(_) => "group",
                }
            )));
        }

        if let ResultTarget::Group(group_id) = target {
            let exists = ProjectGroups::find_by_id(group_id)
                .one(&txn)
                .await
                .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?
                .is_some();
            if !exists {
                return Err(PampError::not_found(format!("Group '{group_id}' not found")));
            }
        }

        let now = chrono::Utc::now().timestamp();
        let mut created = Vec::with_capacity(req.results.len());
        for item in req.results {
            let criterion = GradingCriteria::find_by_id(item.criterion_id)
                .filter(CriterionColumn::ScaleId.eq(draft.id()))
                .one(&txn)
                .await
                .map_err(|e| PampError::database_operation(format!("查询评分标准失败: {e}")))?
                .ok_or_else(|| {
                    PampError::not_found(format!(
                        "Grading criterion '{}' not found in scale '{}'",
                        item.criterion_id,
                        draft.id()
                    ))
                })?;

            let result = GradingResultActiveModel {
                id: Set(Uuid::new_v4()),
                criterion_id: Set(criterion.id),
                target_group_id: Set(target.group_id()),
                target_student_id: Set(target.student_id()),
                score: Set(item.score),
                comment: Set(item.comment),
                created_by: Set(created_by),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("创建评分结果失败: {e}")))?;

            created.push(result.into_result());
        }
        touch_scale(&txn, &draft).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        debug!("Recorded {} results on grading scale {}", created.len(), scale_id);
        Ok(created)
    }

    /// 列出评分表下所有结果
    pub async fn list_grading_results_impl(&self, scale_id: Uuid) -> Result<Vec<GradingResult>> {
        find_scale(&self.db, scale_id).await?;
        Ok(load_criteria(&self.db, scale_id)
            .await?
            .into_iter()
            .flat_map(|c| c.results)
            .collect())
    }

    /// 修改评分结果
    pub async fn update_grading_result_impl(
        &self,
        result_id: Uuid,
        req: UpdateGradingResultRequest,
    ) -> Result<GradingResult> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let result = GradingResults::find_by_id(result_id)
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询评分结果失败: {e}")))?
            .ok_or_else(|| PampError::not_found(format!("Grading result '{result_id}' not found")))?;
        let criterion = find_criterion(&txn, result.criterion_id).await?;
        let draft = load_draft_scale(&txn, criterion.scale_id).await?;

        let mut model = GradingResultActiveModel {
            id: Set(result.id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(score) = req.score {
            model.score = Set(score);
        }
        if let Some(comment) = req.comment {
            model.comment = Set(Some(comment));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("更新评分结果失败: {e}")))?;
        touch_scale(&txn, &draft).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_result())
    }
}

/// 删除若干评分表及其标准、结果（不检查状态，供项目级联删除使用）
pub(super) async fn delete_scales<C: ConnectionTrait>(conn: &C, scale_ids: Vec<Uuid>) -> Result<()> {
    if scale_ids.is_empty() {
        return Ok(());
    }

    let criterion_ids: Vec<Uuid> = GradingCriteria::find()
        .filter(CriterionColumn::ScaleId.is_in(scale_ids.clone()))
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询评分标准失败: {e}")))?
        .into_iter()
        .map(|c| c.id)
        .collect();

    delete_results_of(conn, criterion_ids).await?;

    GradingCriteria::delete_many()
        .filter(CriterionColumn::ScaleId.is_in(scale_ids.clone()))
        .exec(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("删除评分标准失败: {e}")))?;

    GradingScales::delete_many()
        .filter(ScaleColumn::Id.is_in(scale_ids))
        .exec(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("删除评分表失败: {e}")))?;

    Ok(())
}
