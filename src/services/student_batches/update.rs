use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::StudentBatchService;
use crate::errors::PampError;
use crate::models::student_batches::requests::UpdateStudentBatchRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 修改批次；提供 students 时整体替换名单，已有分组不受影响
pub async fn update_batch(
    service: &StudentBatchService,
    request: &HttpRequest,
    batch_id: Uuid,
    req: UpdateStudentBatchRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound));
    }

    let storage = service.get_storage(request)?;
    match storage.update_student_batch(batch_id, req).await {
        Ok(batch) => {
            info!(
                "Student batch {} updated ({} students)",
                batch_id,
                batch.students.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(batch, "Student batch updated")))
        }
        Err(PampError::BadRequest(message)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::StudentBatchAlreadyExists, message),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound)),
    }
}
