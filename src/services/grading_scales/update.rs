use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{GradingScaleService, grading_error};
use crate::models::grading::requests::UpdateGradingScaleRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_grading_scale(
    service: &GradingScaleService,
    request: &HttpRequest,
    scale_id: Uuid,
    req: UpdateGradingScaleRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::GradingScaleNotFound));
    }

    let storage = service.get_storage(request)?;
    match storage.update_grading_scale(scale_id, req).await {
        Ok(scale) => {
            info!("Grading scale {} updated", scale_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(scale, "Grading scale updated")))
        }
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}
