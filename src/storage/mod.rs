use std::sync::Arc;

use uuid::Uuid;

use crate::models::{
    grading::{
        entities::{GradingCriterion, GradingResult, GradingScale},
        requests::{
            CreateGradingCriterionRequest, CreateGradingResultsRequest, CreateGradingScaleRequest,
            GradingScaleQuery, UpdateGradingCriterionRequest, UpdateGradingResultRequest,
            UpdateGradingScaleRequest,
        },
    },
    groups::{
        entities::{NewGroup, ProjectGroup},
        requests::UpdateGroupRequest,
    },
    orals::{
        entities::Oral,
        requests::{CreateOralRequest, UpdateOralRequest},
    },
    projects::{
        entities::{GroupsCreator, Project, ProjectDetail},
        requests::{CreateProjectRequest, ProjectListQuery, UpdateProjectRequest},
        responses::ProjectListResponse,
    },
    steps::{entities::Step, requests::UpsertStepsRequest},
    student_batches::{
        entities::StudentBatch,
        requests::{CreateStudentBatchRequest, UpdateStudentBatchRequest},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 项目修改结果，供服务层决定是否发送通知
#[derive(Debug, Clone)]
pub struct ProjectUpdateOutcome {
    pub project: ProjectDetail,
    // 本次修改重新生成了分组时为对应的分组方式
    pub regrouped: Option<GroupsCreator>,
    // 本次修改把项目从草稿变为发布
    pub newly_published: bool,
}

/// 存储层接口
///
/// 查询类方法对不存在的记录返回 `Ok(None)`；修改类方法把业务规则违例表达为
/// `NotFound` / `Forbidden` / `BadRequest` 错误，且失败时不会留下部分写入。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 评分表
    // 创建评分表（可同时创建评分标准）
    async fn create_grading_scale(
        &self,
        req: CreateGradingScaleRequest,
        created_by: Uuid,
    ) -> Result<GradingScale>;
    // 获取评分表（含评分标准与结果）
    async fn get_grading_scale(&self, scale_id: Uuid) -> Result<Option<GradingScale>>;
    // 修改评分表标题
    async fn update_grading_scale(
        &self,
        scale_id: Uuid,
        req: UpdateGradingScaleRequest,
    ) -> Result<GradingScale>;
    // 删除评分表及其标准、结果
    async fn delete_grading_scale(&self, scale_id: Uuid) -> Result<()>;
    // 确认评分表，确认后不可再修改
    async fn validate_grading_scale(&self, scale_id: Uuid) -> Result<GradingScale>;
    // 按项目列出评分表
    async fn list_project_grading_scales(
        &self,
        project_id: Uuid,
        query: GradingScaleQuery,
    ) -> Result<Vec<GradingScale>>;

    /// 评分标准
    async fn add_grading_criterion(
        &self,
        scale_id: Uuid,
        req: CreateGradingCriterionRequest,
    ) -> Result<GradingCriterion>;
    async fn update_grading_criterion(
        &self,
        criterion_id: Uuid,
        req: UpdateGradingCriterionRequest,
    ) -> Result<GradingCriterion>;
    async fn delete_grading_criterion(&self, criterion_id: Uuid) -> Result<()>;

    /// 评分结果
    // 批量录入，任一条失败则整批回滚
    async fn create_grading_results(
        &self,
        scale_id: Uuid,
        req: CreateGradingResultsRequest,
        created_by: Uuid,
    ) -> Result<Vec<GradingResult>>;
    async fn list_grading_results(&self, scale_id: Uuid) -> Result<Vec<GradingResult>>;
    async fn update_grading_result(
        &self,
        result_id: Uuid,
        req: UpdateGradingResultRequest,
    ) -> Result<GradingResult>;

    /// 项目
    async fn create_project(&self, req: CreateProjectRequest, creator_id: Uuid) -> Result<Project>;
    async fn get_project(&self, project_id: Uuid) -> Result<Option<ProjectDetail>>;
    // 教师创建的项目
    async fn list_projects_by_creator(
        &self,
        creator_id: Uuid,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse>;
    // 学生所在批次中已发布的项目
    async fn list_published_projects_for_student(
        &self,
        student_id: Uuid,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse>;
    // 修改项目，分组字段变化时在同一事务内重建分组
    async fn update_project(
        &self,
        project_id: Uuid,
        req: UpdateProjectRequest,
    ) -> Result<ProjectUpdateOutcome>;
    async fn delete_project(&self, project_id: Uuid) -> Result<()>;
    // 复制项目及其阶段，不复制分组与学生批次
    async fn copy_project(&self, project_id: Uuid) -> Result<ProjectDetail>;

    /// 分组
    async fn create_groups(
        &self,
        project_id: Uuid,
        groups: Vec<NewGroup>,
    ) -> Result<Vec<ProjectGroup>>;
    async fn list_project_groups(&self, project_id: Uuid) -> Result<Vec<ProjectGroup>>;
    async fn list_student_groups(&self, student_id: Uuid) -> Result<Vec<ProjectGroup>>;
    async fn get_group(&self, group_id: Uuid) -> Result<Option<ProjectGroup>>;
    async fn update_group(&self, group_id: Uuid, req: UpdateGroupRequest) -> Result<ProjectGroup>;
    async fn delete_group(&self, group_id: Uuid) -> Result<()>;
    // 组员提交报告，每组只能提交一次
    async fn submit_group_report(&self, group_id: Uuid, student_id: Uuid)
    -> Result<ProjectGroup>;

    /// 学生批次
    async fn create_student_batch(&self, req: CreateStudentBatchRequest) -> Result<StudentBatch>;
    async fn get_student_batch(&self, batch_id: Uuid) -> Result<Option<StudentBatch>>;
    async fn update_student_batch(
        &self,
        batch_id: Uuid,
        req: UpdateStudentBatchRequest,
    ) -> Result<StudentBatch>;
    async fn delete_student_batch(&self, batch_id: Uuid) -> Result<()>;

    /// 项目阶段
    async fn upsert_project_steps(
        &self,
        project_id: Uuid,
        req: UpsertStepsRequest,
    ) -> Result<Vec<Step>>;

    /// 答辩，每个分组至多一个
    async fn create_oral(&self, req: CreateOralRequest) -> Result<Oral>;
    async fn get_oral(&self, oral_id: Uuid) -> Result<Option<Oral>>;
    async fn list_project_orals(&self, project_id: Uuid) -> Result<Vec<Oral>>;
    async fn update_oral(&self, oral_id: Uuid, req: UpdateOralRequest) -> Result<Oral>;
    async fn delete_oral(&self, oral_id: Uuid) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
