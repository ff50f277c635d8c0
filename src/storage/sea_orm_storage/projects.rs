//! 项目存储操作

use super::SeaOrmStorage;
use super::grading::delete_scales;
use super::groups::{delete_project_groups, insert_groups, load_project_groups};
use super::steps::{copy_steps, load_steps};
use super::student_batches::load_roster;
use crate::entity::batch_students::Column as RosterColumn;
use crate::entity::grading_scales::Column as ScaleColumn;
use crate::entity::prelude::*;
use crate::entity::projects::Column;
use crate::entity::steps::Column as StepColumn;
use crate::errors::{PampError, Result};
use crate::models::{
    PaginationInfo,
    projects::{
        entities::{Project, ProjectDetail},
        requests::{CreateProjectRequest, ProjectListQuery, UpdateProjectRequest},
        responses::ProjectListResponse,
    },
};
use crate::storage::ProjectUpdateOutcome;
use crate::utils::partition::{GroupPolicy, plan_groups};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

fn project_not_found(project_id: Uuid) -> PampError {
    PampError::not_found(format!("Project '{project_id}' not found"))
}

async fn find_project<C: ConnectionTrait>(conn: &C, project_id: Uuid) -> Result<ProjectModel> {
    Projects::find_by_id(project_id)
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询项目失败: {e}")))?
        .ok_or_else(|| project_not_found(project_id))
}

async fn ensure_name_free<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<Uuid>,
) -> Result<()> {
    let mut select = Projects::find().filter(Column::Name.eq(name));
    if let Some(id) = except {
        select = select.filter(Column::Id.ne(id));
    }
    let taken = select
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询项目失败: {e}")))?;
    if taken.is_some() {
        return Err(PampError::bad_request(format!(
            "A project named '{name}' already exists"
        )));
    }
    Ok(())
}

async fn ensure_batch_exists<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<()> {
    StudentBatches::find_by_id(batch_id)
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询学生批次失败: {e}")))?
        .ok_or_else(|| PampError::not_found(format!("Student batch '{batch_id}' not found")))?;
    Ok(())
}

async fn load_detail<C: ConnectionTrait>(conn: &C, model: ProjectModel) -> Result<ProjectDetail> {
    let groups = load_project_groups(conn, model.id).await?;
    let steps = load_steps(conn, model.id).await?;
    Ok(ProjectDetail {
        project: model.into_project(),
        groups,
        steps,
    })
}

impl SeaOrmStorage {
    /// 创建项目
    pub async fn create_project_impl(
        &self,
        req: CreateProjectRequest,
        creator_id: Uuid,
    ) -> Result<Project> {
        let name = req.name.trim().to_string();
        ensure_name_free(&self.db, &name, None).await?;
        if let Some(batch_id) = req.student_batch_id {
            ensure_batch_exists(&self.db, batch_id).await?;
        }

        let now = chrono::Utc::now().timestamp();
        let model = ProjectActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(req.description),
            is_published: Set(false),
            creator_id: Set(Some(creator_id)),
            student_batch_id: Set(req.student_batch_id),
            max_groups: Set(req.max_groups),
            max_per_group: Set(req.max_per_group),
            min_per_group: Set(req.min_per_group),
            groups_creator: Set(None),
            creation_group_deadline: Set(req.creation_group_deadline.map(|d| d.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| PampError::database_operation(format!("创建项目失败: {e}")))?;

        info!("Project {} created by {}", model.id, creator_id);
        Ok(model.into_project())
    }

    /// 获取项目详情（含分组与阶段）
    pub async fn get_project_impl(&self, project_id: Uuid) -> Result<Option<ProjectDetail>> {
        let project = Projects::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询项目失败: {e}")))?;

        match project {
            Some(project) => Ok(Some(load_detail(&self.db, project).await?)),
            None => Ok(None),
        }
    }

    async fn paginate_projects(
        &self,
        select: Select<Projects>,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse> {
        let (page, size) = query.pagination.normalized();

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PampError::database_operation(format!("查询项目总数失败: {e}")))?;

        let projects = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PampError::database_operation(format!("查询项目列表失败: {e}")))?;

        let mut items = Vec::with_capacity(projects.len());
        for project in projects {
            items.push(load_detail(&self.db, project).await?);
        }

        Ok(ProjectListResponse {
            pagination: PaginationInfo::new(page, size, total),
            items,
        })
    }

    /// 教师创建的项目（分页）
    pub async fn list_projects_by_creator_impl(
        &self,
        creator_id: Uuid,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse> {
        let select = Projects::find().filter(Column::CreatorId.eq(creator_id));
        self.paginate_projects(select, query).await
    }

    /// 学生可见的项目：已发布且学生在其批次名单中
    pub async fn list_published_projects_for_student_impl(
        &self,
        student_id: Uuid,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse> {
        let batch_ids: Vec<Uuid> = BatchStudents::find()
            .filter(RosterColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询学生名单失败: {e}")))?
            .into_iter()
            .map(|s| s.batch_id)
            .collect();

        let select = Projects::find()
            .filter(Column::IsPublished.eq(true))
            .filter(Column::StudentBatchId.is_in(batch_ids));
        self.paginate_projects(select, query).await
    }

    /// 修改项目
    ///
    /// 分组方式或每组人数变化且项目设置了分组方式时，先按新策略计算分组方案，
    /// 再在同一事务内删除旧分组、写入项目修改与新分组。方案不成立时不做任何写入。
    pub async fn update_project_impl(
        &self,
        project_id: Uuid,
        req: UpdateProjectRequest,
    ) -> Result<ProjectUpdateOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let current = find_project(&txn, project_id).await?;
        let snapshot = current.clone().into_project();

        if let Some(name) = &req.name {
            ensure_name_free(&txn, name.trim(), Some(project_id)).await?;
        }
        if let Some(batch_id) = req.student_batch_id {
            ensure_batch_exists(&txn, batch_id).await?;
        }

        let creator = req.groups_creator.or(snapshot.groups_creator);
        let regroup = match creator {
            Some(creator) if req.changes_grouping(&snapshot) => Some(creator),
            _ => None,
        };

        let plan = match regroup {
            Some(creator) => {
                let policy = GroupPolicy::from_limits(
                    req.min_per_group.or(current.min_per_group),
                    req.max_per_group.or(current.max_per_group),
                    req.max_groups.or(current.max_groups),
                )?;
                let roster = match req.student_batch_id.or(current.student_batch_id) {
                    Some(batch_id) => load_roster(&txn, batch_id).await?,
                    None => Vec::new(),
                };
                let planned = {
                    let mut rng = rand::rng();
                    plan_groups(creator, &roster, &policy, &mut rng)?
                };
                Some(planned)
            }
            None => None,
        };

        let newly_published = req.is_published == Some(true) && !current.is_published;

        let mut model = ProjectActiveModel {
            id: Set(project_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(name) = req.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = req.description {
            model.description = Set(description);
        }
        if let Some(is_published) = req.is_published {
            model.is_published = Set(is_published);
        }
        if let Some(batch_id) = req.student_batch_id {
            model.student_batch_id = Set(Some(batch_id));
        }
        if let Some(max_groups) = req.max_groups {
            model.max_groups = Set(Some(max_groups));
        }
        if let Some(max_per_group) = req.max_per_group {
            model.max_per_group = Set(Some(max_per_group));
        }
        if let Some(min_per_group) = req.min_per_group {
            model.min_per_group = Set(Some(min_per_group));
        }
        if let Some(groups_creator) = req.groups_creator {
            model.groups_creator = Set(Some(groups_creator.to_string()));
        }
        if let Some(deadline) = req.creation_group_deadline {
            model.creation_group_deadline = Set(Some(deadline.timestamp()));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("更新项目失败: {e}")))?;

        if let Some(groups) = plan {
            delete_project_groups(&txn, project_id).await?;
            let created = insert_groups(&txn, project_id, groups).await?;
            info!(
                "Project {} regrouped into {} groups ({:?})",
                project_id,
                created.len(),
                regroup
            );
        }

        let project = load_detail(&txn, updated).await?;
        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(ProjectUpdateOutcome {
            project,
            regrouped: regroup,
            newly_published,
        })
    }

    /// 删除项目及其分组、阶段与评分表
    pub async fn delete_project_impl(&self, project_id: Uuid) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        find_project(&txn, project_id).await?;

        delete_project_groups(&txn, project_id).await?;

        Steps::delete_many()
            .filter(StepColumn::ProjectId.eq(project_id))
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("删除项目阶段失败: {e}")))?;

        let scale_ids: Vec<Uuid> = GradingScales::find()
            .filter(ScaleColumn::ProjectId.eq(project_id))
            .all(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询评分表失败: {e}")))?
            .into_iter()
            .map(|s| s.id)
            .collect();
        delete_scales(&txn, scale_ids).await?;

        Projects::delete_by_id(project_id)
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("删除项目失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Project {} deleted", project_id);
        Ok(())
    }

    /// 复制项目
    ///
    /// 新项目名为 "<原名> (Copy)"，未发布、未设置分组方式、不关联学生批次，
    /// 保留人数限制并复制全部阶段，不复制分组。
    pub async fn copy_project_impl(&self, project_id: Uuid) -> Result<ProjectDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let source = find_project(&txn, project_id).await?;
        let name = format!("{} (Copy)", source.name);
        ensure_name_free(&txn, &name, None).await?;

        let now = chrono::Utc::now().timestamp();
        let copy = ProjectActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(source.description),
            is_published: Set(false),
            creator_id: Set(source.creator_id),
            student_batch_id: Set(None),
            max_groups: Set(source.max_groups),
            max_per_group: Set(source.max_per_group),
            min_per_group: Set(source.min_per_group),
            groups_creator: Set(None),
            creation_group_deadline: Set(source.creation_group_deadline),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| PampError::database_operation(format!("复制项目失败: {e}")))?;

        let steps = copy_steps(&txn, project_id, copy.id).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        debug!(
            "Project {} copied to {} with {} steps",
            project_id,
            copy.id,
            steps.len()
        );
        Ok(ProjectDetail {
            project: copy.into_project(),
            groups: Vec::new(),
            steps,
        })
    }
}

