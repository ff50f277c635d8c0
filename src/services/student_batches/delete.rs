use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::StudentBatchService;
use crate::models::{ApiResponse, ErrorCode};

// 引用该批次的项目会解除关联
pub async fn delete_batch(
    service: &StudentBatchService,
    request: &HttpRequest,
    batch_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_student_batch(batch_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student batch deleted"))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound)),
    }
}
