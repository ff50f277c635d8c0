pub mod list;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::steps::requests::UpsertStepsRequest;
use crate::storage::Storage;

pub struct StepService {
    storage: Option<Arc<dyn Storage>>,
}

impl StepService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub async fn upsert_steps(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
        req: UpsertStepsRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_steps(self, request, project_id, req).await
    }

    pub async fn list_steps(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        list::list_steps(self, request, project_id).await
    }
}
