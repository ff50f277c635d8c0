use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};
use uuid::Uuid;

use super::{GradingScaleService, grading_error};
use crate::errors::PampError;
use crate::models::{ApiResponse, ErrorCode};

/// 确认评分表
///
/// 所有评分标准都至少有一条结果时才能确认，确认后评分表只读。
pub async fn validate_grading_scale(
    service: &GradingScaleService,
    request: &HttpRequest,
    scale_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.validate_grading_scale(scale_id).await {
        Ok(scale) => {
            info!("Grading scale {} validated", scale_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(scale, "Grading scale validated")))
        }
        Err(PampError::BadRequest(message)) => {
            warn!("Grading scale {} cannot be validated: {}", scale_id, message);
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::GradingScaleNotValidatable,
                message,
            )))
        }
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}
