pub mod create;
pub mod delete;
pub mod detail;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::student_batches::requests::{
    CreateStudentBatchRequest, UpdateStudentBatchRequest,
};
use crate::storage::Storage;

pub struct StudentBatchService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentBatchService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub async fn create_batch(
        &self,
        request: &HttpRequest,
        req: CreateStudentBatchRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_batch(self, request, req).await
    }

    pub async fn get_batch(&self, request: &HttpRequest, batch_id: Uuid) -> ActixResult<HttpResponse> {
        detail::get_batch(self, request, batch_id).await
    }

    pub async fn update_batch(
        &self,
        request: &HttpRequest,
        batch_id: Uuid,
        req: UpdateStudentBatchRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_batch(self, request, batch_id, req).await
    }

    pub async fn delete_batch(
        &self,
        request: &HttpRequest,
        batch_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        delete::delete_batch(self, request, batch_id).await
    }
}
