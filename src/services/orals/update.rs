use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{OralService, load_oral};
use crate::middlewares::RequireIdentity;
use crate::models::orals::requests::UpdateOralRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::groups::load_owned_group;
use crate::services::unauthorized;

/// 调整答辩时段
///
/// 合并后的时段同样要求结束时间晚于开始时间，由存储层在事务内校验。
pub async fn update_oral(
    service: &OralService,
    request: &HttpRequest,
    oral_id: Uuid,
    req: UpdateOralRequest,
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

    match storage.update_oral(oral_id, req).await {
        Ok(oral) => {
            info!("Oral {} rescheduled", oral_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(oral, "Oral updated")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::OralNotFound)),
    }
}
