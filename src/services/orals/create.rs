use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::OralService;
use crate::errors::PampError;
use crate::middlewares::RequireIdentity;
use crate::models::orals::requests::CreateOralRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::groups::load_owned_group;
use crate::services::unauthorized;

/// 为分组安排答辩时段
///
/// 每个分组至多一个答辩，重复创建返回 400。
pub async fn create_oral(
    service: &OralService,
    request: &HttpRequest,
    req: CreateOralRequest,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };

    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::OralNotFound));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = load_owned_group(storage.as_ref(), &identity, req.group_id).await {
        return Ok(response);
    }

    match storage.create_oral(req).await {
        Ok(oral) => {
            info!("Oral {} scheduled for group {}", oral.id, oral.group_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(oral, "Oral created")))
        }
        Err(PampError::BadRequest(message)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::OralAlreadyExists, message),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
    }
}
