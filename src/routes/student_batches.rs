use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::identity::entities::UserRole;
use crate::models::student_batches::requests::{
    CreateStudentBatchRequest, UpdateStudentBatchRequest,
};
use crate::services::StudentBatchService;
use crate::utils::SafeId;

// 懒加载的全局 StudentBatchService 实例
static STUDENT_BATCH_SERVICE: Lazy<StudentBatchService> =
    Lazy::new(StudentBatchService::new_lazy);

pub async fn create_batch(
    req: HttpRequest,
    body: web::Json<CreateStudentBatchRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_BATCH_SERVICE
        .create_batch(&req, body.into_inner())
        .await
}

pub async fn get_batch(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    STUDENT_BATCH_SERVICE.get_batch(&req, path.0).await
}

pub async fn update_batch(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateStudentBatchRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_BATCH_SERVICE
        .update_batch(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_batch(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    STUDENT_BATCH_SERVICE.delete_batch(&req, path.0).await
}

// 配置路由：学生批次只对教师和管理员开放
pub fn configure_student_batches_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student-batches")
            .wrap(RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireIdentity)
            .service(web::resource("").route(web::post().to(create_batch)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_batch))
                    .route(web::patch().to(update_batch))
                    .route(web::delete().to(delete_batch)),
            ),
    );
}
