use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradingScaleService, grading_error};
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn get_grading_scale(
    service: &GradingScaleService,
    request: &HttpRequest,
    scale_id: uuid::Uuid,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage.get_grading_scale(scale_id).await {
        // 学生只能看到已确认的评分
        Ok(Some(scale)) if !identity.is_teacher() && !scale.is_validated => {
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradingScaleNotFound,
                format!("Grading scale '{scale_id}' not found"),
            )))
        }
        Ok(Some(scale)) => Ok(HttpResponse::Ok().json(ApiResponse::success(scale, "OK"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradingScaleNotFound,
            format!("Grading scale '{scale_id}' not found"),
        ))),
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}
