use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::{OralService, load_oral};
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, unauthorized};

// 教师可查看任意答辩；学生只能查看自己分组的答辩
pub async fn get_oral(
    service: &OralService,
    request: &HttpRequest,
    oral_id: Uuid,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request)?;
    let oral = match load_oral(storage.as_ref(), oral_id).await {
        Ok(oral) => oral,
        Err(response) => return Ok(response),
    };

    if !identity.is_teacher() {
        let is_member = match storage.get_group(oral.group_id).await {
            Ok(group) => group.is_some_and(|group| group.members.contains(&identity.user_id)),
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
        };
        if !is_member {
            return Ok(forbidden("You are not a member of this group"));
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(oral, "OK")))
}
