use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentBatchService;
use crate::errors::PampError;
use crate::models::student_batches::requests::CreateStudentBatchRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_batch(
    service: &StudentBatchService,
    request: &HttpRequest,
    req: CreateStudentBatchRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound));
    }

    let storage = service.get_storage(request)?;
    match storage.create_student_batch(req).await {
        Ok(batch) => Ok(HttpResponse::Created().json(ApiResponse::success(batch, "Student batch created"))),
        Err(PampError::BadRequest(message)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::StudentBatchAlreadyExists, message),
        )),
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound)),
    }
}
