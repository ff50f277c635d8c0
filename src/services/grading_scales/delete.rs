use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{GradingScaleService, grading_error};
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_grading_scale(
    service: &GradingScaleService,
    request: &HttpRequest,
    scale_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_grading_scale(scale_id).await {
        Ok(()) => {
            info!("Grading scale {} deleted", scale_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Grading scale deleted")))
        }
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}
