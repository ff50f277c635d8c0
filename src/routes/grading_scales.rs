use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::grading::requests::{
    CreateGradingCriterionRequest, CreateGradingResultsRequest, CreateGradingScaleRequest,
    GradingScaleQuery, UpdateGradingCriterionRequest, UpdateGradingResultRequest,
    UpdateGradingScaleRequest,
};
use crate::models::identity::entities::UserRole;
use crate::services::GradingScaleService;
use crate::utils::{SafeCriterionId, SafeId, SafeResultId};

// 懒加载的全局 GradingScaleService 实例
static GRADING_SCALE_SERVICE: Lazy<GradingScaleService> =
    Lazy::new(GradingScaleService::new_lazy);

// 创建评分表
pub async fn create_grading_scale(
    req: HttpRequest,
    body: web::Json<CreateGradingScaleRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .create_grading_scale(&req, body.into_inner())
        .await
}

// 获取评分表
pub async fn get_grading_scale(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE.get_grading_scale(&req, path.0).await
}

// 修改评分表标题
pub async fn update_grading_scale(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateGradingScaleRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .update_grading_scale(&req, path.0, body.into_inner())
        .await
}

// 删除评分表
pub async fn delete_grading_scale(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE.delete_grading_scale(&req, path.0).await
}

// 确认评分表
pub async fn validate_grading_scale(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .validate_grading_scale(&req, path.0)
        .await
}

// 按项目列出评分表
pub async fn list_project_grading_scales(
    req: HttpRequest,
    path: SafeId,
    query: web::Query<GradingScaleQuery>,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .list_project_grading_scales(&req, path.0, query.into_inner())
        .await
}

// 添加评分标准
pub async fn add_grading_criterion(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<CreateGradingCriterionRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .add_grading_criterion(&req, path.0, body.into_inner())
        .await
}

// 修改评分标准
pub async fn update_grading_criterion(
    req: HttpRequest,
    path: SafeCriterionId,
    body: web::Json<UpdateGradingCriterionRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .update_grading_criterion(&req, path.0, body.into_inner())
        .await
}

// 删除评分标准
pub async fn delete_grading_criterion(
    req: HttpRequest,
    path: SafeCriterionId,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .delete_grading_criterion(&req, path.0)
        .await
}

// 批量录入评分结果
pub async fn create_grading_results(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<CreateGradingResultsRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .create_grading_results(&req, path.0, body.into_inner())
        .await
}

// 列出评分结果
pub async fn list_grading_results(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE.list_grading_results(&req, path.0).await
}

// 修改评分结果
pub async fn update_grading_result(
    req: HttpRequest,
    path: SafeResultId,
    body: web::Json<UpdateGradingResultRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SCALE_SERVICE
        .update_grading_result(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_grading_scales_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grading-scales")
            .wrap(middlewares::RequireIdentity)
            // 创建评分表 - 仅教师和管理员
            .service(
                web::resource("").route(
                    web::post()
                        .to(create_grading_scale)
                        .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            // 评分标准 - 仅教师和管理员
            .service(
                web::resource("/criteria/{criterion_id}")
                    .route(web::put().to(update_grading_criterion))
                    .route(web::delete().to(delete_grading_criterion))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            )
            // 评分结果 - 仅教师和管理员
            .service(
                web::resource("/results/{result_id}")
                    .route(web::put().to(update_grading_result))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}")
                    // 获取评分表 - 学生只能看到已确认的评分表（业务层检查）
                    .route(web::get().to(get_grading_scale))
                    .route(
                        web::patch()
                            .to(update_grading_scale)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_grading_scale)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_grading_scale)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/validate")
                    .route(web::post().to(validate_grading_scale))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/criteria")
                    .route(web::post().to(add_grading_criterion))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/results")
                    .route(web::post().to(create_grading_results))
                    .route(web::get().to(list_grading_results))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}
