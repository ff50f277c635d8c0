use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::StepService;
use crate::middlewares::RequireIdentity;
use crate::models::steps::requests::UpsertStepsRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::projects::load_owned_project;
use crate::services::unauthorized;

/// 整体提交项目阶段，顺序即请求中的顺序
pub async fn upsert_steps(
    service: &StepService,
    request: &HttpRequest,
    project_id: Uuid,
    req: UpsertStepsRequest,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };

    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = load_owned_project(storage.as_ref(), &identity, project_id).await {
        return Ok(response);
    }

    match storage.upsert_project_steps(project_id, req).await {
        Ok(steps) => {
            info!("Project {} steps saved ({} steps)", project_id, steps.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success(steps, "Steps saved")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::NotFound)),
    }
}
