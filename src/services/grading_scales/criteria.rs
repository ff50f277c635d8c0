//! 评分标准的增删改，均要求所属评分表尚未确认

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{GradingScaleService, grading_error};
use crate::models::grading::requests::{
    CreateGradingCriterionRequest, UpdateGradingCriterionRequest,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn add_grading_criterion(
    service: &GradingScaleService,
    request: &HttpRequest,
    scale_id: Uuid,
    req: CreateGradingCriterionRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::GradingScaleNotFound));
    }

    let storage = service.get_storage(request)?;
    match storage.add_grading_criterion(scale_id, req).await {
        Ok(criterion) => {
            info!("Criterion {} added to grading scale {}", criterion.id, scale_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(criterion, "Criterion added")))
        }
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}

pub async fn update_grading_criterion(
    service: &GradingScaleService,
    request: &HttpRequest,
    criterion_id: Uuid,
    req: UpdateGradingCriterionRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::GradingCriterionNotFound));
    }

    let storage = service.get_storage(request)?;
    match storage.update_grading_criterion(criterion_id, req).await {
        Ok(criterion) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            criterion,
            "Criterion updated",
        ))),
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingCriterionNotFound)),
    }
}

pub async fn delete_grading_criterion(
    service: &GradingScaleService,
    request: &HttpRequest,
    criterion_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_grading_criterion(criterion_id).await {
        Ok(()) => {
            info!("Criterion {} deleted", criterion_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Criterion deleted")))
        }
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingCriterionNotFound)),
    }
}
