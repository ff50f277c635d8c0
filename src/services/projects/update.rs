use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};
use uuid::Uuid;

use super::{ProjectService, load_owned_project, notify};
use crate::clients::{Mailer, UserDirectory};
use crate::middlewares::RequireIdentity;
use crate::models::projects::requests::UpdateProjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_component, unauthorized};

/// 修改项目
///
/// 分组字段变化时存储层会在同一事务内重建分组；提交后按需发送发布/分组通知。
pub async fn update_project(
    service: &ProjectService,
    request: &HttpRequest,
    project_id: Uuid,
    req: UpdateProjectRequest,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };

    if let Err(e) = req.validate() {
        return Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = load_owned_project(storage.as_ref(), &identity, project_id).await {
        return Ok(response);
    }

    let outcome = match storage.update_project(project_id, req).await {
        Ok(outcome) => outcome,
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    };

    if let Some(creator) = outcome.regrouped {
        info!(
            "Project {} regrouped ({}) into {} groups",
            project_id,
            creator,
            outcome.project.groups.len()
        );
    }

    if outcome.newly_published || outcome.regrouped.is_some() {
        let credential = RequireIdentity::extract_credential(request);
        let directory = app_component::<dyn UserDirectory>(request, "UserDirectory");
        let mailer = app_component::<Mailer>(request, "Mailer");
        match (credential, directory, mailer) {
            (Some(credential), Ok(directory), Ok(mailer)) => {
                notify::spawn_project_notifications(
                    storage.clone(),
                    directory,
                    mailer,
                    credential.0,
                    outcome.clone(),
                );
            }
            _ => warn!(
                "Notification collaborators unavailable, project {} update is silent",
                project_id
            ),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome.project, "Project updated")))
}
