use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};
use uuid::Uuid;

use super::{GroupService, load_owned_group};
use crate::clients::UserDirectory;
use crate::middlewares::RequireIdentity;
use crate::models::groups::requests::UpdateGroupRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_component, unauthorized};

/// 修改分组名称或成员
///
/// 目录服务中不存在的成员 id 会被丢弃。
pub async fn update_group(
    service: &GroupService,
    request: &HttpRequest,
    group_id: Uuid,
    mut req: UpdateGroupRequest,
) -> ActixResult<HttpResponse> {
    let (Some(identity), Some(credential)) = (
        RequireIdentity::extract_identity(request),
        RequireIdentity::extract_credential(request),
    ) else {
        return Ok(unauthorized());
    };

    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = load_owned_group(storage.as_ref(), &identity, group_id).await {
        return Ok(response);
    }

    if let Some(members) = req.members.take() {
        let directory = app_component::<dyn UserDirectory>(request, "UserDirectory")?;
        let requested = members.len();
        let known = match directory.retain_known_users(&credential.0, members).await {
            Ok(known) => known,
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
        };
        if known.len() < requested {
            warn!(
                "Dropped {} unknown members from group {}",
                requested - known.len(),
                group_id
            );
        }
        req.members = Some(known);
    }

    match storage.update_group(group_id, req).await {
        Ok(group) => {
            info!("Group {} updated", group_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(group, "Group updated")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
    }
}
