use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{GroupService, load_owned_group};
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn delete_group(
    service: &GroupService,
    request: &HttpRequest,
    group_id: Uuid,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request)?;
    if let Err(response) = load_owned_group(storage.as_ref(), &identity, group_id).await {
        return Ok(response);
    }

    match storage.delete_group(group_id).await {
        Ok(()) => {
            info!("Group {} deleted", group_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Group deleted")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
    }
}
