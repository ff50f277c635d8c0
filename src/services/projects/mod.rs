pub mod copy;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod notify;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::identity::entities::{Identity, UserRole};
use crate::models::projects::{
    entities::ProjectDetail,
    requests::{CreateProjectRequest, ProjectListQuery, UpdateProjectRequest},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct ProjectService {
    storage: Option<Arc<dyn Storage>>,
}

/// 读取项目并确认调用方是创建者（管理员不受限）
///
/// 失败时返回可直接交给客户端的响应。
pub(crate) async fn load_owned_project(
    storage: &dyn Storage,
    identity: &Identity,
    project_id: Uuid,
) -> Result<ProjectDetail, HttpResponse> {
    let detail = match storage.get_project(project_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ProjectNotFound,
                format!("Project '{project_id}' not found"),
            )));
        }
        Err(e) => return Err(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    };

    if identity.role != UserRole::Admin && detail.project.creator_id != Some(identity.user_id) {
        return Err(crate::services::forbidden(
            "Only the project creator can manage this project",
        ));
    }
    Ok(detail)
}

impl ProjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub async fn create_project(
        &self,
        request: &HttpRequest,
        req: CreateProjectRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_project(self, request, req).await
    }

    pub async fn get_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        detail::get_project(self, request, project_id).await
    }

    pub async fn list_projects(
        &self,
        request: &HttpRequest,
        query: ProjectListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_projects(self, request, query).await
    }

    pub async fn update_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
        req: UpdateProjectRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_project(self, request, project_id, req).await
    }

    pub async fn delete_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        delete::delete_project(self, request, project_id).await
    }

    pub async fn copy_project(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        copy::copy_project(self, request, project_id).await
    }
}
