use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradingScaleService, grading_error};
use crate::middlewares::RequireIdentity;
use crate::models::grading::requests::CreateGradingScaleRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn create_grading_scale(
    service: &GradingScaleService,
    request: &HttpRequest,
    req: CreateGradingScaleRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireIdentity::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::GradingScaleNotFound));
    }

    let storage = service.get_storage(request)?;

    // 关联项目必须存在
    if let Some(project_id) = req.project_id {
        match storage.get_project(project_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::ProjectNotFound,
                    format!("Project '{project_id}' not found"),
                )));
            }
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
        }
    }

    match storage.create_grading_scale(req, user_id).await {
        Ok(scale) => {
            info!("User {} created grading scale {}", user_id, scale.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(scale, "Grading scale created")))
        }
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}
