use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{GradingScaleService, grading_error};
use crate::middlewares::RequireIdentity;
use crate::models::grading::{
    requests::{CreateGradingResultsRequest, UpdateGradingResultRequest},
    responses::GradingResultListResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

/// 批量录入评分结果，任一条失败则整批不写入
pub async fn create_grading_results(
    service: &GradingScaleService,
    request: &HttpRequest,
    scale_id: Uuid,
    req: CreateGradingResultsRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireIdentity::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage.create_grading_results(scale_id, req, user_id).await {
        Ok(results) => {
            info!(
                "User {} recorded {} results on grading scale {}",
                user_id,
                results.len(),
                scale_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                GradingResultListResponse { items: results },
                "Results recorded",
            )))
        }
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}

pub async fn list_grading_results(
    service: &GradingScaleService,
    request: &HttpRequest,
    scale_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.list_grading_results(scale_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradingResultListResponse { items },
            "OK",
        ))),
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}

pub async fn update_grading_result(
    service: &GradingScaleService,
    request: &HttpRequest,
    result_id: Uuid,
    req: UpdateGradingResultRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::GradingResultNotFound));
    }

    let storage = service.get_storage(request)?;
    match storage.update_grading_result(result_id, req).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Result updated"))),
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingResultNotFound)),
    }
}
