use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::OralService;
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::projects::load_owned_project;
use crate::services::unauthorized;

pub async fn list_project_orals(
    service: &OralService,
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

    match storage.list_project_orals(project_id).await {
        Ok(orals) => Ok(HttpResponse::Ok().json(ApiResponse::success(orals, "OK"))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    }
}
