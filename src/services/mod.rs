pub mod grading_scales;
pub mod groups;
pub mod orals;
pub mod projects;
pub mod steps;
pub mod student_batches;

pub use grading_scales::GradingScaleService;
pub use groups::GroupService;
pub use orals::OralService;
pub use projects::ProjectService;
pub use steps::StepService;
pub use student_batches::StudentBatchService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error, web};
use std::sync::Arc;
use tracing::error;

use crate::models::{ApiResponse, ErrorCode};

/// 从 app_data 取出启动时注册的共享组件
pub(crate) fn app_component<T: ?Sized + 'static>(
    request: &HttpRequest,
    name: &str,
) -> ActixResult<Arc<T>> {
    request
        .app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("{} not found in app data", name);
            error::ErrorInternalServerError(format!("{name} is not configured"))
        })
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Authentication required",
    ))
}

pub(crate) fn forbidden(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}
