use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::groups::requests::{CreateGroupsRequest, UpdateGroupRequest};
use crate::models::identity::entities::UserRole;
use crate::services::GroupService;
use crate::utils::SafeId;

// 懒加载的全局 GroupService 实例
static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);

// 在项目下创建分组（路径中的 id 为项目 id）
pub async fn create_groups(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<CreateGroupsRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .create_groups(&req, path.0, body.into_inner())
        .await
}

// 列出项目分组（路径中的 id 为项目 id）
pub async fn list_project_groups(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_project_groups(&req, path.0).await
}

// 当前学生所在的分组
pub async fn list_my_groups(req: HttpRequest) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_my_groups(&req).await
}

pub async fn update_group(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateGroupRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .update_group(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_group(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.delete_group(&req, path.0).await
}

// 提交分组报告
pub async fn submit_report(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.submit_report(&req, path.0).await
}

// 配置路由
pub fn configure_groups_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/groups")
            .wrap(middlewares::RequireIdentity)
            // 必须在 /{id} 之前注册
            .service(web::resource("/mine").route(web::get().to(list_my_groups)))
            .service(
                web::resource("/{id}")
                    .route(web::patch().to(update_group))
                    .route(web::delete().to(delete_group))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles())),
            )
            // 组员提交报告 - 成员资格在业务层检查
            .service(web::resource("/{id}/report").route(web::post().to(submit_report))),
    );
}
