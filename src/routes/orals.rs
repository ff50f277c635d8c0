use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::identity::entities::UserRole;
use crate::models::orals::requests::{CreateOralRequest, UpdateOralRequest};
use crate::services::OralService;
use crate::utils::SafeId;

// 懒加载的全局 OralService 实例
static ORAL_SERVICE: Lazy<OralService> = Lazy::new(OralService::new_lazy);

pub async fn create_oral(
    req: HttpRequest,
    body: web::Json<CreateOralRequest>,
) -> ActixResult<HttpResponse> {
    ORAL_SERVICE.create_oral(&req, body.into_inner()).await
}

pub async fn get_oral(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ORAL_SERVICE.get_oral(&req, path.0).await
}

// 项目下的答辩安排（路径中的 id 为项目 id）
pub async fn list_project_orals(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ORAL_SERVICE.list_project_orals(&req, path.0).await
}

pub async fn update_oral(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateOralRequest>,
) -> ActixResult<HttpResponse> {
    ORAL_SERVICE
        .update_oral(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_oral(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ORAL_SERVICE.delete_oral(&req, path.0).await
}

// 配置路由
pub fn configure_orals_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/orals")
            .wrap(middlewares::RequireIdentity)
            .service(
                web::resource("").route(
                    web::post()
                        .to(create_oral)
                        .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    // 学生只能查看自己分组的答辩（业务层检查）
                    .route(web::get().to(get_oral))
                    .route(
                        web::patch()
                            .to(update_oral)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_oral)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
