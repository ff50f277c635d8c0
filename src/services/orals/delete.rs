use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{OralService, load_oral};
use crate::middlewares::RequireIdentity;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::groups::load_owned_group;
use crate::services::unauthorized;

pub async fn delete_oral(
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
    if let Err(response) = load_owned_group(storage.as_ref(), &identity, oral.group_id).await {
        return Ok(response);
    }

    match storage.delete_oral(oral_id).await {
        Ok(()) => {
            info!("Oral {} deleted", oral_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Oral deleted")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::OralNotFound)),
    }
}
