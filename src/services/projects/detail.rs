use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::ProjectService;
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn get_project(
    service: &ProjectService,
    request: &HttpRequest,
    project_id: Uuid,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let not_found = || {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProjectNotFound,
            format!("Project '{project_id}' not found"),
        ))
    };

    let detail = match storage.get_project(project_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Ok(not_found()),
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    };

    // 学生只能看到自己批次中已发布的项目
    if !identity.is_teacher() {
        let visible = match (detail.project.is_published, detail.project.student_batch_id) {
            (true, Some(batch_id)) => match storage.get_student_batch(batch_id).await {
                Ok(Some(batch)) => batch.students.contains(&identity.user_id),
                Ok(None) => false,
                Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound)),
            },
            _ => false,
        };
        if !visible {
            return Ok(not_found());
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "OK")))
}
