pub mod create;
pub mod criteria;
pub mod delete;
pub mod detail;
pub mod list;
pub mod results;
pub mod update;
pub mod validate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::PampError;
use crate::models::grading::requests::{
    CreateGradingCriterionRequest, CreateGradingResultsRequest, CreateGradingScaleRequest,
    GradingScaleQuery, UpdateGradingCriterionRequest, UpdateGradingResultRequest,
    UpdateGradingScaleRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct GradingScaleService {
    storage: Option<Arc<dyn Storage>>,
}

/// 评分相关错误：已确认的评分表单独使用 `GradingScaleLocked`
pub(crate) fn grading_error(err: &PampError, not_found: ErrorCode) -> HttpResponse {
    match err {
        PampError::Forbidden(_) => HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::GradingScaleLocked,
            err.message(),
        )),
        _ => ApiResponse::from_error(err, not_found),
    }
}

impl GradingScaleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub async fn create_grading_scale(
        &self,
        request: &HttpRequest,
        req: CreateGradingScaleRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grading_scale(self, request, req).await
    }

    pub async fn get_grading_scale(
        &self,
        request: &HttpRequest,
        scale_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        detail::get_grading_scale(self, request, scale_id).await
    }

    pub async fn update_grading_scale(
        &self,
        request: &HttpRequest,
        scale_id: Uuid,
        req: UpdateGradingScaleRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grading_scale(self, request, scale_id, req).await
    }

    pub async fn delete_grading_scale(
        &self,
        request: &HttpRequest,
        scale_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        delete::delete_grading_scale(self, request, scale_id).await
    }

    pub async fn validate_grading_scale(
        &self,
        request: &HttpRequest,
        scale_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        validate::validate_grading_scale(self, request, scale_id).await
    }

    pub async fn list_project_grading_scales(
        &self,
        request: &HttpRequest,
        project_id: Uuid,
        query: GradingScaleQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_project_grading_scales(self, request, project_id, query).await
    }

    pub async fn add_grading_criterion(
        &self,
        request: &HttpRequest,
        scale_id: Uuid,
        req: CreateGradingCriterionRequest,
    ) -> ActixResult<HttpResponse> {
        criteria::add_grading_criterion(self, request, scale_id, req).await
    }

    pub async fn update_grading_criterion(
        &self,
        request: &HttpRequest,
        criterion_id: Uuid,
        req: UpdateGradingCriterionRequest,
    ) -> ActixResult<HttpResponse> {
        criteria::update_grading_criterion(self, request, criterion_id, req).await
    }

    pub async fn delete_grading_criterion(
        &self,
        request: &HttpRequest,
        criterion_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        criteria::delete_grading_criterion(self, request, criterion_id).await
    }

    pub async fn create_grading_results(
        &self,
        request: &HttpRequest,
        scale_id: Uuid,
        req: CreateGradingResultsRequest,
    ) -> ActixResult<HttpResponse> {
        results::create_grading_results(self, request, scale_id, req).await
    }

    pub async fn list_grading_results(
        &self,
        request: &HttpRequest,
        scale_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        results::list_grading_results(self, request, scale_id).await
    }

    pub async fn update_grading_result(
        &self,
        request: &HttpRequest,
        result_id: Uuid,
        req: UpdateGradingResultRequest,
    ) -> ActixResult<HttpResponse> {
        results::update_grading_result(self, request, result_id, req).await
    }
}
