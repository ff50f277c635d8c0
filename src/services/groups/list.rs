use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::GroupService;
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn list_project_groups(
    service: &GroupService,
    request: &HttpRequest,
    project_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_project(project_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail.groups, "OK"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProjectNotFound,
            format!("Project '{project_id}' not found"),
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    }
}

// 当前学生所在的全部分组
pub async fn list_my_groups(
    service: &GroupService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireIdentity::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage.list_student_groups(user_id).await {
        Ok(groups) => Ok(HttpResponse::Ok().json(ApiResponse::success(groups, "OK"))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
    }
}
