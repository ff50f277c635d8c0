use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::GroupService;
use crate::middlewares::RequireIdentity;
use crate::models::groups::requests::CreateGroupsRequest;
use crate::models::identity::entities::Identity;
use crate::models::projects::entities::{GroupsCreator, ProjectDetail};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::projects::load_owned_project;
use crate::services::{forbidden, unauthorized};

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
}

// 学生自行组队：项目已发布、分组方式为 STUDENT、截止时间未到，且只能创建包含自己的一个分组；
// 调用方与成员都必须在项目的学生名单中，人数受项目的分组人数与分组数量限制
fn check_student_creation(
    detail: &ProjectDetail,
    roster: &[Uuid],
    identity: &Identity,
    req: &CreateGroupsRequest,
) -> Result<(), HttpResponse> {
    let project = &detail.project;
    if !project.is_published || project.groups_creator != Some(GroupsCreator::Student) {
        return Err(forbidden("Groups of this project are not created by students"));
    }
    if project
        .creation_group_deadline
        .is_some_and(|deadline| deadline < chrono::Utc::now())
    {
        return Err(forbidden("The group creation deadline has passed"));
    }
    if !roster.contains(&identity.user_id) {
        return Err(forbidden("You are not enrolled in this project"));
    }
    if req.groups.len() != 1 || !req.groups[0].members.contains(&identity.user_id) {
        return Err(forbidden("Students can only create one group they belong to"));
    }

    let members = &req.groups[0].members;
    if let Some(outsider) = members.iter().find(|m| !roster.contains(m)) {
        return Err(bad_request(format!(
            "Student {outsider} is not enrolled in this project"
        )));
    }

    let size = members.len() as i32;
    if project.min_per_group.is_some_and(|min| size < min)
        || project.max_per_group.is_some_and(|max| size > max)
    {
        return Err(bad_request(format!(
            "A group of {size} members is outside the allowed group size"
        )));
    }

    // 空的占位分组不计入分组数量
    let occupied = detail.groups.iter().filter(|g| !g.members.is_empty()).count() as i32;
    if project.max_groups.is_some_and(|max| occupied >= max) {
        return Err(bad_request("The maximum number of groups has been reached"));
    }
    Ok(())
}

pub async fn create_groups(
    service: &GroupService,
    request: &HttpRequest,
    project_id: Uuid,
    req: CreateGroupsRequest,
) -> ActixResult<HttpResponse> {
    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    if identity.is_teacher() {
        if let Err(response) = load_owned_project(storage.as_ref(), &identity, project_id).await {
            return Ok(response);
        }
    } else {
        let detail = match storage.get_project(project_id).await {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::ProjectNotFound,
                    format!("Project '{project_id}' not found"),
                )));
            }
            Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
        };
        let roster = match detail.project.student_batch_id {
            Some(batch_id) => match storage.get_student_batch(batch_id).await {
                Ok(batch) => batch.map(|b| b.students).unwrap_or_default(),
                Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::StudentBatchNotFound)),
            },
            None => Vec::new(),
        };
        if let Err(response) = check_student_creation(&detail, &roster, &identity, &req) {
            return Ok(response);
        }
    }

    let groups = match req.into_new_groups() {
        Ok(groups) => groups,
        Err(e) => return Ok(ApiResponse::from_error(&e, ErrorCode::GroupNotFound)),
    };

    match storage.create_groups(project_id, groups).await {
        Ok(created) => {
            info!(
                "User {} created {} groups in project {}",
                identity.user_id,
                created.len(),
                project_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "Groups created")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e, ErrorCode::ProjectNotFound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::groups::entities::ProjectGroup;
    use crate::models::groups::requests::CreateGroupItem;
    use crate::models::identity::entities::UserRole;
    use crate::models::projects::entities::Project;
    use actix_web::http::StatusCode;
    use chrono::Utc;

    fn project(max_groups: Option<i32>, groups: Vec<ProjectGroup>) -> ProjectDetail {
        ProjectDetail {
            project: Project {
                id: Uuid::new_v4(),
                name: "Networks".into(),
                description: String::new(),
                is_published: true,
                creator_id: Some(Uuid::new_v4()),
                student_batch_id: Some(Uuid::new_v4()),
                max_groups,
                max_per_group: Some(2),
                min_per_group: Some(1),
                groups_creator: Some(GroupsCreator::Student),
                creation_group_deadline: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            groups,
            steps: Vec::new(),
        }
    }

    fn student(user_id: Uuid) -> Identity {
        Identity {
            user_id,
            email: "sam@school.test".into(),
            first_name: "Sam".into(),
            last_name: "Test".into(),
            role: UserRole::Student,
            is_active: true,
        }
    }

    fn request(members: Vec<Uuid>) -> CreateGroupsRequest {
        CreateGroupsRequest {
            groups: vec![CreateGroupItem {
                name: "Team".into(),
                members,
            }],
        }
    }

    fn group(members: Vec<Uuid>) -> ProjectGroup {
        ProjectGroup {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: format!("Group {}", members.len()),
            members,
            report_submitted: false,
            report_submitted_at: None,
            created_at: Utc::now(),
        }
    }

    fn status(result: Result<(), HttpResponse>) -> StatusCode {
        match result {
            Ok(()) => StatusCode::OK,
            Err(response) => response.status(),
        }
    }

    #[test]
    fn test_enrolled_student_within_limits() {
        let (me, mate) = (Uuid::new_v4(), Uuid::new_v4());
        let detail = project(None, Vec::new());
        let result = check_student_creation(&detail, &[me, mate], &student(me), &request(vec![me, mate]));
        assert!(result.is_ok());
    }

    #[test]
    fn test_caller_outside_roster_is_forbidden() {
        let (me, other) = (Uuid::new_v4(), Uuid::new_v4());
        let detail = project(None, Vec::new());
        let result = check_student_creation(&detail, &[other], &student(me), &request(vec![me]));
        assert_eq!(status(result), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_member_outside_roster_is_rejected() {
        let me = Uuid::new_v4();
        let detail = project(None, Vec::new());
        let result = check_student_creation(
            &detail,
            &[me],
            &student(me),
            &request(vec![me, Uuid::new_v4()]),
        );
        assert_eq!(status(result), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_oversized_group_is_rejected() {
        let roster: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let detail = project(None, Vec::new());
        let result =
            check_student_creation(&detail, &roster, &student(roster[0]), &request(roster.clone()));
        assert_eq!(status(result), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_max_groups_ignores_empty_placeholders() {
        let roster: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let me = roster[2];

        let placeholders = project(Some(1), vec![group(Vec::new()), group(Vec::new())]);
        let result = check_student_creation(&placeholders, &roster, &student(me), &request(vec![me]));
        assert!(result.is_ok());

        let full = project(Some(1), vec![group(vec![roster[0], roster[1]])]);
        let result = check_student_creation(&full, &roster, &student(me), &request(vec![me]));
        assert_eq!(status(result), StatusCode::BAD_REQUEST);
    }
}
