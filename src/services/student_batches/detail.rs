use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::StudentBatchService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_batch(
    service: &StudentBatchService,
    request: &HttpRequest,
    batch_id: Uuid,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_student_batch(batch_id).await {
        Ok(Some(batch)) => Ok(HttpResponse::Ok().json(ApiResponse::success(batch, "OK"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentBatchNotFound,
            format!("Student batch '{batch_id}' not found"),
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound)),
    }
}
