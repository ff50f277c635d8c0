//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 涉及多行写入的操作全部在显式事务中完成。

mod grading;
mod groups;
mod orals;
mod projects;
mod steps;
mod student_batches;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{PampError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 按数据库配置连接并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PampError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite 数据库（单连接），用于测试
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PampError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        // 内存库的数据只存在于单个连接中，连接不能被回收
        let (max_connections, idle_timeout) = if in_memory {
            (1, None)
        } else {
            (config.pool_size, Some(Duration::from_secs(300)))
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(idle_timeout)
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(opt)
            .await
            .map_err(|e| PampError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PampError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PampError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
        entities::{Project, ProjectDetail},
        requests::{CreateProjectRequest, ProjectListQuery, UpdateProjectRequest},
        responses::ProjectListResponse,
    },
    steps::{entities::Step, requests::UpsertStepsRequest},
    student_batches::{
        entities::StudentBatch,
        requests::{CreateStudentBatchRequest, UpdateStudentBatchRequest},
    },
};
use crate::storage::{ProjectUpdateOutcome, Storage};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 评分表模块
    async fn create_grading_scale(
        &self,
        req: CreateGradingScaleRequest,
        created_by: Uuid,
    ) -> Result<GradingScale> {
        self.create_grading_scale_impl(req, created_by).await
    }

    async fn get_grading_scale(&self, scale_id: Uuid) -> Result<Option<GradingScale>> {
        self.get_grading_scale_impl(scale_id).await
    }

    async fn update_grading_scale(
        &self,
        scale_id: Uuid,
        req: UpdateGradingScaleRequest,
    ) -> Result<GradingScale> {
        self.update_grading_scale_impl(scale_id, req).await
    }

    async fn delete_grading_scale(&self, scale_id: Uuid) -> Result<()> {
        self.delete_grading_scale_impl(scale_id).await
    }

    async fn validate_grading_scale(&self, scale_id: Uuid) -> Result<GradingScale> {
        self.validate_grading_scale_impl(scale_id).await
    }

    async fn list_project_grading_scales(
        &self,
        project_id: Uuid,
        query: GradingScaleQuery,
    ) -> Result<Vec<GradingScale>> {
        self.list_project_grading_scales_impl(project_id, query)
            .await
    }

    async fn add_grading_criterion(
        &self,
        scale_id: Uuid,
        req: CreateGradingCriterionRequest,
    ) -> Result<GradingCriterion> {
        self.add_grading_criterion_impl(scale_id, req).await
    }

    async fn update_grading_criterion(
        &self,
        criterion_id: Uuid,
        req: UpdateGradingCriterionRequest,
    ) -> Result<GradingCriterion> {
        self.update_grading_criterion_impl(criterion_id, req).await
    }

    async fn delete_grading_criterion(&self, criterion_id: Uuid) -> Result<()> {
        self.delete_grading_criterion_impl(criterion_id).await
    }

    async fn create_grading_results(
        &self,
        scale_id: Uuid,
        req: CreateGradingResultsRequest,
        created_by: Uuid,
    ) -> Result<Vec<GradingResult>> {
        self.create_grading_results_impl(scale_id, req, created_by)
            .await
    }

    async fn list_grading_results(&self, scale_id: Uuid) -> Result<Vec<GradingResult>> {
        self.list_grading_results_impl(scale_id).await
    }

    async fn update_grading_result(
        &self,
        result_id: Uuid,
        req: UpdateGradingResultRequest,
    ) -> Result<GradingResult> {
        self.update_grading_result_impl(result_id, req).await
    }

    // 项目模块
    async fn create_project(&self, req: CreateProjectRequest, creator_id: Uuid) -> Result<Project> {
        self.create_project_impl(req, creator_id).await
    }

    async fn get_project(&self, project_id: Uuid) -> Result<Option<ProjectDetail>> {
        self.get_project_impl(project_id).await
    }

    async fn list_projects_by_creator(
        &self,
        creator_id: Uuid,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse> {
        self.list_projects_by_creator_impl(creator_id, query).await
    }

    async fn list_published_projects_for_student(
        &self,
        student_id: Uuid,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse> {
        self.list_published_projects_for_student_impl(student_id, query)
            .await
    }

    async fn update_project(
        &self,
        project_id: Uuid,
        req: UpdateProjectRequest,
    ) -> Result<ProjectUpdateOutcome> {
        self.update_project_impl(project_id, req).await
    }

    async fn delete_project(&self, project_id: Uuid) -> Result<()> {
        self.delete_project_impl(project_id).await
    }

    async fn copy_project(&self, project_id: Uuid) -> Result<ProjectDetail> {
        self.copy_project_impl(project_id).await
    }

    // 分组模块
    async fn create_groups(
        &self,
        project_id: Uuid,
        groups: Vec<NewGroup>,
    ) -> Result<Vec<ProjectGroup>> {
        self.create_groups_impl(project_id, groups).await
    }

    async fn list_project_groups(&self, project_id: Uuid) -> Result<Vec<ProjectGroup>> {
        self.list_project_groups_impl(project_id).await
    }

    async fn list_student_groups(&self, student_id: Uuid) -> Result<Vec<ProjectGroup>> {
        self.list_student_groups_impl(student_id).await
    }

    async fn get_group(&self, group_id: Uuid) -> Result<Option<ProjectGroup>> {
        self.get_group_impl(group_id).await
    }

    async fn update_group(&self, group_id: Uuid, req: UpdateGroupRequest) -> Result<ProjectGroup> {
        self.update_group_impl(group_id, req).await
    }

    async fn delete_group(&self, group_id: Uuid) -> Result<()> {
        self.delete_group_impl(group_id).await
    }

    async fn submit_group_report(
        &self,
        group_id: Uuid,
        student_id: Uuid,
    ) -> Result<ProjectGroup> {
        self.submit_group_report_impl(group_id, student_id).await
    }

    // 学生批次模块
    async fn create_student_batch(&self, req: CreateStudentBatchRequest) -> Result<StudentBatch> {
        self.create_student_batch_impl(req).await
    }

    async fn get_student_batch(&self, batch_id: Uuid) -> Result<Option<StudentBatch>> {
        self.get_student_batch_impl(batch_id).await
    }

    async fn update_student_batch(
        &self,
        batch_id: Uuid,
        req: UpdateStudentBatchRequest,
    ) -> Result<StudentBatch> {
        self.update_student_batch_impl(batch_id, req).await
    }

    async fn delete_student_batch(&self, batch_id: Uuid) -> Result<()> {
        self.delete_student_batch_impl(batch_id).await
    }

    // 项目阶段模块
    async fn upsert_project_steps(
        &self,
        project_id: Uuid,
        req: UpsertStepsRequest,
    ) -> Result<Vec<Step>> {
        self.upsert_project_steps_impl(project_id, req).await
    }

    // 答辩模块
    async fn create_oral(&self, req: CreateOralRequest) -> Result<Oral> {
        self.create_oral_impl(req).await
    }

    async fn get_oral(&self, oral_id: Uuid) -> Result<Option<Oral>> {
        self.get_oral_impl(oral_id).await
    }

    async fn list_project_orals(&self, project_id: Uuid) -> Result<Vec<Oral>> {
        self.list_project_orals_impl(project_id).await
    }

    async fn update_oral(&self, oral_id: Uuid, req: UpdateOralRequest) -> Result<Oral> {
        self.update_oral_impl(oral_id, req).await
    }

    async fn delete_oral(&self, oral_id: Uuid) -> Result<()> {
        self.delete_oral_impl(oral_id).await
    }
}
