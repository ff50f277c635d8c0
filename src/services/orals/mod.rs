pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::orals::entities::Oral;
use crate::models::orals::requests::{CreateOralRequest, UpdateOralRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct OralService {
    storage: Option<Arc<dyn Storage>>,
}

// 答辩不存在时返回 404
pub(crate) async fn load_oral(storage: &dyn Storage, oral_id: Uuid) -> Result<Oral, HttpResponse> {
    match storage.get_oral(oral_id).await {
        Ok(Some(oral)) => Ok(oral),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::OralNotFound,
            format!("Oral '{oral_id}' not found"),
        ))),
        Err(e) => Err(ApiResponse::from_error(&e, ErrorCode::OralNotFound)),
    }
}

impl OralService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub async fn create_oral(
        &self,
        request: &HttpRequest,
        req: CreateOralRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_oral(self, request, req).await
    }

    pub async fn get_oral(&self, request: &HttpRequest, oral_id: Uuid) -> ActixResult<HttpResponse> {
        detail::get_oral(self, request, oral_id).await
    }

    pub async fn list_project_orals(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        list::list_project_orals(self, request, project_id).await
    }

    pub async fn update_oral(
        &self,
        request: &HttpRequest,
        oral_id: Uuid,
        req: UpdateOralRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_oral(self, request, oral_id, req).await
    }

    pub async fn delete_oral(
        &self,
        request: &HttpRequest,
        oral_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        delete::delete_oral(self, request, oral_id).await
    }
}
