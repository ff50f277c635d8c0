//! HTTP 层集成测试：真实路由 + 内存数据库 + 固定身份的用户目录

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use uuid::Uuid;

use rust_pamp_next::cache::ObjectCache;
use rust_pamp_next::cache::object_cache::moka::MokaCacheWrapper;
use rust_pamp_next::clients::{Mailer, UserDirectory};
use rust_pamp_next::config::NotificationConfig;
use rust_pamp_next::errors::{PampError, Result};
use rust_pamp_next::models::ErrorCode;
use rust_pamp_next::models::identity::entities::{Identity, UserRole};
use rust_pamp_next::routes;
use rust_pamp_next::storage::Storage;
use rust_pamp_next::storage::sea_orm_storage::SeaOrmStorage;
use rust_pamp_next::utils::{json_error_handler, query_error_handler};

// 以 "Bearer <name>" 识别调用方
struct TokenDirectory {
    by_token: HashMap<String, Identity>,
}

#[async_trait]
impl UserDirectory for TokenDirectory {
    async fn current_identity(&self, authorization: &str) -> Result<Identity> {
        self.by_token
            .get(authorization)
            .cloned()
            .ok_or_else(|| PampError::authentication("Invalid or expired token"))
    }

    async fn find_user(&self, _authorization: &str, user_id: Uuid) -> Result<Option<Identity>> {
        Ok(self
            .by_token
            .values()
            .find(|identity| identity.user_id == user_id)
            .cloned())
    }
}

fn identity(name: &str, role: UserRole) -> Identity {
    Identity {
        user_id: Uuid::new_v4(),
        email: format!("{name}@school.test"),
        first_name: name.to_string(),
        last_name: "Test".to_string(),
        role,
        is_active: true,
    }
}

struct Fixture {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    directory: Arc<dyn UserDirectory>,
    mailer: Arc<Mailer>,
    teacher: Identity,
    student: Identity,
}

async fn fixture() -> Fixture {
    let teacher = identity("teacher", UserRole::Teacher);
    let student = identity("student", UserRole::Student);
    let mut by_token = HashMap::new();
    by_token.insert("Bearer teacher".to_string(), teacher.clone());
    by_token.insert("Bearer student".to_string(), student.clone());
    by_token.insert(
        "Bearer colleague".to_string(),
        identity("colleague", UserRole::Teacher),
    );

    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database"),
    );
    let mailer = Mailer::new(NotificationConfig {
        enabled: false,
        api_url: String::new(),
        api_key: String::new(),
        from: "noreply@pamp.test".into(),
        frontend_url: "http://app.local".into(),
        timeout: 5,
    })
    .expect("mailer");

    Fixture {
        storage,
        cache: Arc::new(MokaCacheWrapper::new(100, 60)),
        directory: Arc::new(TokenDirectory { by_token }),
        mailer: Arc::new(mailer),
        teacher,
        student,
    }
}

macro_rules! app {
    ($fx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($fx.storage.clone()))
                .app_data(web::Data::new($fx.cache.clone()))
                .app_data(web::Data::new($fx.directory.clone()))
                .app_data(web::Data::new($fx.mailer.clone()))
                .configure(routes::configure_grading_scales_routes)
                .configure(routes::configure_projects_routes)
                .configure(routes::configure_groups_routes)
                .configure(routes::configure_orals_routes)
                .configure(routes::configure_student_batches_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer nobody"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::Unauthorized as i32);
}

#[actix_web::test]
async fn test_students_cannot_create_projects() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer student"))
        .set_json(json!({ "name": "Forbidden project" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_teacher_project_lifecycle() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Compilers", "description": "Build a compiler" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_string();
    assert_eq!(body["data"]["creator_id"], fx.teacher.user_id.to_string());

    // 重名
    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Compilers" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::ProjectAlreadyExists as i32);

    let req = test::TestRequest::get()
        .uri("/api/v1/projects?page=1&size=10")
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    // 草稿项目对学生不可见
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .insert_header(("Authorization", "Bearer student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/copy"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    // ProjectDetail 展平了项目字段
    assert_eq!(body["data"]["name"], "Compilers (Copy)");
    assert_eq!(body["data"]["is_published"], false);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_invalid_path_id_is_bad_request() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/v1/grading-scales/not-a-uuid")
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_validated_scale_is_locked_over_http() {
    let fx = fixture().await;
    let app = app!(fx);
    let student_id = fx.student.user_id;

    let req = test::TestRequest::post()
        .uri("/api/v1/grading-scales")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({
            "type": "defense",
            "target_id": Uuid::new_v4(),
            "notation_mode": "individual",
            "title": "Oral defense",
            "criteria": [{ "label": "Clarity", "max_points": 10.0 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let scale_id = body["data"]["id"].as_str().expect("scale id").to_string();
    let criterion_id = body["data"]["criteria"][0]["id"]
        .as_str()
        .expect("criterion id")
        .to_string();

    // 未确认的评分表对学生不可见
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/grading-scales/{scale_id}"))
        .insert_header(("Authorization", "Bearer student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/grading-scales/{scale_id}/results"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({
            "target_student_id": student_id,
            "results": [{ "criterion_id": criterion_id, "score": 8.5 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/grading-scales/{scale_id}/validate"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/grading-scales/{scale_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "title": "Too late" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::GradingScaleLocked as i32);

    // 第二次确认
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/grading-scales/{scale_id}/validate"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::GradingScaleNotValidatable as i32);

    // 确认后学生可以查看
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/grading-scales/{scale_id}"))
        .insert_header(("Authorization", "Bearer student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_published_project_visible_to_rostered_student() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/v1/student-batches")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Promo 2026", "students": [fx.student.user_id] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let batch_id = body["data"]["id"].as_str().expect("batch id").to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Networks", "student_batch_id": batch_id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_string();

    // 只给出一个人数限制时无法分组
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "is_published": true, "groups_creator": "STUDENT", "min_per_group": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({
            "is_published": true,
            "groups_creator": "STUDENT",
            "min_per_group": 1,
            "max_per_group": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer student"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    // 学生自行组队
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/groups"))
        .insert_header(("Authorization", "Bearer student"))
        .set_json(json!({ "groups": [{ "name": "Solo", "members": [fx.student.user_id] }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/groups/mine")
        .insert_header(("Authorization", "Bearer student"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_only_project_owner_manages_groups() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Databases" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/groups"))
        .insert_header(("Authorization", "Bearer colleague"))
        .set_json(json!({ "groups": [{ "name": "Alpha" }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/groups"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "groups": [{ "name": "Alpha" }] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let group_id = body["data"][0]["id"].as_str().expect("group id").to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/groups/{group_id}"))
        .insert_header(("Authorization", "Bearer colleague"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/groups/{}", Uuid::new_v4()))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], ErrorCode::GroupNotFound as i32);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/groups/{group_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_student_outside_roster_cannot_self_group() {
    let fx = fixture().await;
    let app = app!(fx);
    let classmate = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/api/v1/student-batches")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Promo 2027", "students": [classmate] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let batch_id = body["data"]["id"].as_str().expect("batch id").to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Security", "student_batch_id": batch_id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({
            "is_published": true,
            "groups_creator": "STUDENT",
            "min_per_group": 1,
            "max_per_group": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let members: Vec<Uuid> = std::iter::once(fx.student.user_id)
        .chain((0..5).map(|_| Uuid::new_v4()))
        .collect();
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/groups"))
        .insert_header(("Authorization", "Bearer student"))
        .set_json(json!({ "groups": [{ "name": "Crowd", "members": members }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{project_id}/groups"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let groups = body["data"].as_array().expect("group list");
    assert!(groups.iter().all(|g| g["name"] != "Crowd"));
}

#[actix_web::test]
async fn test_group_gets_a_single_oral_slot() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "name": "Compilers" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/groups"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "groups": [{ "name": "Alpha" }] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let group_id = body["data"][0]["id"].as_str().expect("group id").to_string();

    let slot = json!({
        "group_id": group_id,
        "start_time": "2026-06-12T09:00:00Z",
        "end_time": "2026-06-12T09:30:00Z"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/orals")
        .insert_header(("Authorization", "Bearer colleague"))
        .set_json(&slot)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/orals")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(&slot)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let oral_id = body["data"]["id"].as_str().expect("oral id").to_string();
    assert_eq!(body["data"]["group_name"], "Alpha");

    let req = test::TestRequest::post()
        .uri("/api/v1/orals")
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(&slot)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::OralAlreadyExists as i32);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/orals/{oral_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .set_json(json!({ "end_time": "2026-06-12T08:00:00Z" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 学生不在该分组中
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/orals/{oral_id}"))
        .insert_header(("Authorization", "Bearer student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{project_id}/orals"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/groups/{group_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/orals/{oral_id}"))
        .insert_header(("Authorization", "Bearer teacher"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], ErrorCode::OralNotFound as i32);
}
