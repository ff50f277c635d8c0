use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::GroupService;
use crate::errors::PampError;
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

/// 组员提交报告，每组只能提交一次
pub async fn submit_report(
    service: &GroupService,
    request: &HttpRequest,
    group_id: Uuid,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireIdentity::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage.submit_group_report(group_id, user_id).await {
        Ok(group) => {
            info!("Student {} submitted the report of group {}", user_id, group_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(group, "Report submitted")))
        }
        Err(PampError::BadRequest(message)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::ReportAlreadySubmitted, message),
        )),
        Err(PampError::Forbidden(message)) => Ok(HttpResponse::Forbidden().json(
            ApiResponse::error_empty(ErrorCode::NotGroupMember, message),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
    }
}
