pub mod create;
pub mod delete;
pub mod list;
pub mod report;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::groups::entities::ProjectGroup;
use crate::models::groups::requests::{CreateGroupsRequest, UpdateGroupRequest};
use crate::models::identity::entities::Identity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::projects::load_owned_project;
use crate::storage::Storage;

pub struct GroupService {
    storage: Option<Arc<dyn Storage>>,
}

/// 读取分组并确认调用方可以管理它所属的项目
pub(crate) async fn load_owned_group(
    storage: &dyn Storage,
    identity: &Identity,
    group_id: Uuid,
) -> Result<ProjectGroup, HttpResponse> {
    let group = match storage.get_group(group_id).await {
        Ok(Some(group)) => group,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GroupNotFound,
                format!("Group '{group_id}' not found"),
            )));
        }
        Err(e) => return Err(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
    };

    load_owned_project(storage, identity, group.project_id).await?;
    Ok(group)
}

impl GroupService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub async fn create_groups(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
        req: CreateGroupsRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_groups(self, request, project_id, req).await
    }

    pub async fn list_project_groups(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        list::list_project_groups(self, request, project_id).await
    }

    pub async fn list_my_groups(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_groups(self, request).await
    }

    pub async fn update_group(
        &self,
        request: &HttpRequest,
        group_id: Uuid,
        req: UpdateGroupRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_group(self, request, group_id, req).await
    }

    pub async fn delete_group(
        &self,
        request: &HttpRequest,
        group_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        delete::delete_group(self, request, group_id).await
    }

    pub async fn submit_report(
        &self,
        request: &HttpRequest,
        group_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        report::submit_report(self, request, group_id).await
    }
}
