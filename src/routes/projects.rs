use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{grading_scales, groups, orals};
use crate::middlewares::{self, RequireRole};
use crate::models::identity::entities::UserRole;
use crate::models::projects::requests::{
    CreateProjectRequest, ProjectListQuery, UpdateProjectRequest,
};
use crate::models::steps::requests::UpsertStepsRequest;
use crate::services::{ProjectService, StepService};
use crate::utils::SafeId;

// 懒加载的全局服务实例
static PROJECT_SERVICE: Lazy<ProjectService> = Lazy::new(ProjectService::new_lazy);
static STEP_SERVICE: Lazy<StepService> = Lazy::new(StepService::new_lazy);

pub async fn create_project(
    req: HttpRequest,
    body: web::Json<CreateProjectRequest>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE
        .create_project(&req, body.into_inner())
        .await
}

// 列出项目（业务层根据角色返回不同数据）
pub async fn list_projects(
    req: HttpRequest,
    query: web::Query<ProjectListQuery>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE
        .list_projects(&req, query.into_inner())
        .await
}

pub async fn get_project(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.get_project(&req, path.0).await
}

pub async fn update_project(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateProjectRequest>,
) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE
        .update_project(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_project(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.delete_project(&req, path.0).await
}

pub async fn copy_project(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    PROJECT_SERVICE.copy_project(&req, path.0).await
}

pub async fn upsert_steps(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpsertStepsRequest>,
) -> ActixResult<HttpResponse> {
    STEP_SERVICE
        .upsert_steps(&req, path.0, body.into_inner())
        .await
}

pub async fn list_steps(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    STEP_SERVICE.list_steps(&req, path.0).await
}

// 配置路由
pub fn configure_projects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/projects")
            .wrap(middlewares::RequireIdentity)
            .service(
                web::resource("")
                    // 列出项目 - 所有登录用户可访问
                    .route(web::get().to(list_projects))
                    // 创建项目 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_project)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    // 获取项目 - 学生只能看到自己批次中已发布的项目（业务层检查）
                    .route(web::get().to(get_project))
                    .route(
                        web::patch()
                            .to(update_project)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_project)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/copy")
                    .route(web::post().to(copy_project))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/groups")
                    .route(web::get().to(groups::list_project_groups))
                    // 学生自行组队的权限在业务层检查
                    .route(web::post().to(groups::create_groups)),
            )
            .service(
                web::resource("/{id}/steps")
                    .route(web::get().to(list_steps))
                    .route(
                        web::put()
                            .to(upsert_steps)
                            .wrap(RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/orals")
                    .route(web::get().to(orals::list_project_orals))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/grading-scales")
                    .route(web::get().to(grading_scales::list_project_grading_scales))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}
