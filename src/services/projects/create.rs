use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ProjectService;
use crate::errors::PampError;
use crate::middlewares::RequireIdentity;
use crate::models::projects::requests::CreateProjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn create_project(
    service: &ProjectService,
    request: &HttpRequest,
    req: CreateProjectRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireIdentity::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound));
    }

    let storage = service.get_storage(request)?;
    match storage.create_project(req, user_id).await {
        Ok(project) => {
            info!("User {} created project {}", user_id, project.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(project, "Project created")))
        }
        Err(PampError::BadRequest(message)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::ProjectAlreadyExists, message),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound)),
    }
}
