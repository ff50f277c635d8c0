use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{ProjectService, load_owned_project};
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

/// 删除项目及其分组、阶段和评分表
pub async fn delete_project(
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

    match storage.delete_project(project_id).await {
        Ok(()) => {
            info!("User {} deleted project {}", identity.user_id, project_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Project deleted")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    }
}
