use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{ProjectService, load_owned_project};
use crate::errors::PampError;
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

/// 复制项目：阶段一并复制，分组和学生批次不复制，副本为草稿
pub async fn copy_project(
    service: &ProjectService,
    request: &HttpRequest,
    project_id: Uuid,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    if let Err(response) = load_owned_project(storage.as_ref(), &identity, project_id).await {
        return Ok(response);
    }

    match storage.copy_project(project_id).await {
        Ok(copy) => {
            info!(
                "Project {} copied to {} with {} steps",
                project_id,
                copy.project.id,
                copy.steps.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(copy, "Project copied")))
        }
        Err(PampError::BadRequest(message)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::ProjectAlreadyExists, message),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    }
}
