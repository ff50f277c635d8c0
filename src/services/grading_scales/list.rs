use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::{GradingScaleService, grading_error};
use crate::models::grading::{requests::GradingScaleQuery, responses::GradingScaleListResponse};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_project_grading_scales(
    service: &GradingScaleService,
    request: &HttpRequest,
    project_id: Uuid,
    query: GradingScaleQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

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

    match storage.list_project_grading_scales(project_id, query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradingScaleListResponse { items },
            "OK",
        ))),
        Err(e) => Ok(grading_error(&e, ErrorCode::GradingScaleNotFound)),
    }
}
