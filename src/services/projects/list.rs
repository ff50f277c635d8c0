use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProjectService;
use crate::middlewares::RequireIdentity;
use crate::models::projects::requests::ProjectListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

/// 教师看到自己创建的项目，学生看到所在批次中已发布的项目
pub async fn list_projects(
    service: &ProjectService,
    request: &HttpRequest,
    query: ProjectListQuery,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let result = if identity.is_teacher() {
        storage
            .list_projects_by_creator(identity.user_id, query)
            .await
    } else {
        storage
            .list_published_projects_for_student(identity.user_id, query)
            .await
    };

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "OK"))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    }
}
