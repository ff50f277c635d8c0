//! 存储层集成测试：内存 SQLite + 全量迁移

use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};

use rust_pamp_next::errors::PampError;
use rust_pamp_next::models::grading::entities::{GradingScale, NotationMode, ScaleType};
use rust_pamp_next::models::grading::requests::{
    CreateGradingCriterionRequest, CreateGradingResultsRequest, CreateGradingScaleRequest,
    GradingResultItem, UpdateGradingCriterionRequest, UpdateGradingResultRequest,
    UpdateGradingScaleRequest,
};
use rust_pamp_next::models::groups::entities::NewGroup;
use rust_pamp_next::models::groups::requests::UpdateGroupRequest;
use rust_pamp_next::models::orals::requests::{CreateOralRequest, UpdateOralRequest};
use rust_pamp_next::models::projects::entities::GroupsCreator;
use rust_pamp_next::models::projects::requests::{CreateProjectRequest, UpdateProjectRequest};
use rust_pamp_next::models::steps::requests::{UpsertStepRequest, UpsertStepsRequest};
use rust_pamp_next::models::student_batches::entities::BatchState;
use rust_pamp_next::models::student_batches::requests::{
    CreateStudentBatchRequest, UpdateStudentBatchRequest,
};
use rust_pamp_next::storage::Storage;
use rust_pamp_next::storage::sea_orm_storage::SeaOrmStorage;
use uuid::Uuid;

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::in_memory()
        .await
        .expect("in-memory database with migrations")
}

fn criterion(label: &str) -> CreateGradingCriterionRequest {
    CreateGradingCriterionRequest {
        label: label.to_string(),
        max_points: 20.0,
        weight: None,
        comment_enabled: true,
    }
}

async fn individual_scale(storage: &SeaOrmStorage, labels: &[&str]) -> GradingScale {
    storage
        .create_grading_scale(
            CreateGradingScaleRequest {
                scale_type: ScaleType::Deliverable,
                target_id: Uuid::new_v4(),
                notation_mode: NotationMode::Individual,
                title: "Final delivery".to_string(),
                project_id: None,
                criteria: labels.iter().map(|l| criterion(l)).collect(),
            },
            Uuid::new_v4(),
        )
        .await
        .expect("scale created")
}

fn results_for(student: Uuid, criteria: &[Uuid]) -> CreateGradingResultsRequest {
    CreateGradingResultsRequest {
        target_group_id: None,
        target_student_id: Some(student),
        results: criteria
            .iter()
            .map(|id| GradingResultItem {
                criterion_id: *id,
                score: 12.5,
                comment: None,
            })
            .collect(),
    }
}

async fn batch_of(storage: &SeaOrmStorage, name: &str, students: Vec<Uuid>) -> Uuid {
    storage
        .create_student_batch(CreateStudentBatchRequest {
            name: name.to_string(),
            state: BatchState::Active,
            tags: String::new(),
            students,
        })
        .await
        .expect("batch created")
        .id
}

async fn project_named(storage: &SeaOrmStorage, name: &str, batch: Option<Uuid>) -> Uuid {
    storage
        .create_project(
            CreateProjectRequest {
                name: name.to_string(),
                description: String::new(),
                student_batch_id: batch,
                max_groups: None,
                max_per_group: None,
                min_per_group: None,
                creation_group_deadline: None,
            },
            Uuid::new_v4(),
        )
        .await
        .expect("project created")
        .id
}

#[tokio::test]
async fn test_validated_scale_rejects_every_mutation() {
    let storage = storage().await;
    let scale = individual_scale(&storage, &["Code quality"]).await;
    let criterion_id = scale.criteria[0].id;

    let results = storage
        .create_grading_results(
            scale.id,
            results_for(Uuid::new_v4(), &[criterion_id]),
            Uuid::new_v4(),
        )
        .await
        .expect("results recorded");
    let result_id = results[0].id;

    let validated = storage
        .validate_grading_scale(scale.id)
        .await
        .expect("scale validates");
    assert!(validated.is_validated);
    assert!(validated.validated_at.is_some());

    let forbidden = |r: Result<(), PampError>| assert!(matches!(r, Err(PampError::Forbidden(_))));

    forbidden(
        storage
            .update_grading_scale(
                scale.id,
                UpdateGradingScaleRequest {
                    title: Some("Renamed".into()),
                },
            )
            .await
            .map(|_| ()),
    );
    forbidden(storage.delete_grading_scale(scale.id).await);
    forbidden(
        storage
            .add_grading_criterion(scale.id, criterion("Tests"))
            .await
            .map(|_| ()),
    );
    forbidden(
        storage
            .update_grading_criterion(
                criterion_id,
                UpdateGradingCriterionRequest {
                    label: Some("Style".into()),
                    ..Default::default()
                },
            )
            .await
            .map(|_| ()),
    );
    forbidden(storage.delete_grading_criterion(criterion_id).await);
    forbidden(
        storage
            .create_grading_results(
                scale.id,
                results_for(Uuid::new_v4(), &[criterion_id]),
                Uuid::new_v4(),
            )
            .await
            .map(|_| ()),
    );
    forbidden(
        storage
            .update_grading_result(
                result_id,
                UpdateGradingResultRequest {
                    score: Some(3.0),
                    comment: None,
                },
            )
            .await
            .map(|_| ()),
    );

    // 评分表保持不变
    let reloaded = storage
        .get_grading_scale(scale.id)
        .await
        .expect("query")
        .expect("scale still exists");
    assert_eq!(reloaded.title, "Final delivery");
    assert_eq!(reloaded.criteria.len(), 1);
    assert_eq!(reloaded.criteria[0].results.len(), 1);
}

#[tokio::test]
async fn test_validate_names_the_ungraded_criterion() {
    let storage = storage().await;
    let scale = individual_scale(&storage, &["A", "B"]).await;
    let a = scale.criteria.iter().find(|c| c.label == "A").expect("A").id;

    storage
        .create_grading_results(scale.id, results_for(Uuid::new_v4(), &[a]), Uuid::new_v4())
        .await
        .expect("result on A");

    match storage.validate_grading_scale(scale.id).await {
        Err(PampError::BadRequest(message)) => assert!(message.contains("'B'"), "{message}"),
        other => panic!("expected BadRequest naming B, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validate_without_criteria_and_twice() {
    let storage = storage().await;
    let empty = individual_scale(&storage, &[]).await;
    assert!(matches!(
        storage.validate_grading_scale(empty.id).await,
        Err(PampError::BadRequest(_))
    ));

    let scale = individual_scale(&storage, &["Only"]).await;
    let only = scale.criteria[0].id;
    storage
        .create_grading_results(scale.id, results_for(Uuid::new_v4(), &[only]), Uuid::new_v4())
        .await
        .expect("result");
    storage
        .validate_grading_scale(scale.id)
        .await
        .expect("first validate");
    assert!(matches!(
        storage.validate_grading_scale(scale.id).await,
        Err(PampError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_results_of_scale_without_criteria_are_empty() {
    let storage = storage().await;
    let empty = individual_scale(&storage, &[]).await;

    let results = storage
        .list_grading_results(empty.id)
        .await
        .expect("listing succeeds");
    assert!(results.is_empty());

    assert!(matches!(
        storage.list_grading_results(Uuid::new_v4()).await,
        Err(PampError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_missing_grading_entities_are_not_found() {
    let storage = storage().await;

    assert!(matches!(
        storage
            .add_grading_criterion(Uuid::new_v4(), criterion("Orphan"))
            .await,
        Err(PampError::NotFound(_))
    ));
    assert!(matches!(
        storage
            .update_grading_criterion(
                Uuid::new_v4(),
                UpdateGradingCriterionRequest {
                    label: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await,
        Err(PampError::NotFound(_))
    ));
    assert!(matches!(
        storage
            .update_grading_result(
                Uuid::new_v4(),
                UpdateGradingResultRequest {
                    score: Some(10.0),
                    comment: None,
                },
            )
            .await,
        Err(PampError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_result_batch_is_all_or_nothing() {
    let storage = storage().await;
    let scale = individual_scale(&storage, &["Mine"]).await;
    let other = individual_scale(&storage, &["Foreign"]).await;

    let outcome = storage
        .create_grading_results(
            scale.id,
            results_for(Uuid::new_v4(), &[scale.criteria[0].id, other.criteria[0].id]),
            Uuid::new_v4(),
        )
        .await;
    assert!(matches!(outcome, Err(PampError::NotFound(_))));

    let stored = storage
        .list_grading_results(scale.id)
        .await
        .expect("listing works");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_group_result_requires_group_notation() {
    let storage = storage().await;
    let scale = individual_scale(&storage, &["Mine"]).await;

    let outcome = storage
        .create_grading_results(
            scale.id,
            CreateGradingResultsRequest {
                target_group_id: Some(Uuid::new_v4()),
                target_student_id: None,
                results: vec![GradingResultItem {
                    criterion_id: scale.criteria[0].id,
                    score: 10.0,
                    comment: None,
                }],
            },
            Uuid::new_v4(),
        )
        .await;
    assert!(matches!(outcome, Err(PampError::Validation(_))));
}

#[tokio::test]
async fn test_random_regroup_of_ten_students_by_four() {
    let storage = storage().await;
    let students: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
    let batch = batch_of(&storage, "2026 promo", students.clone()).await;
    let project = project_named(&storage, "Compilers", Some(batch)).await;

    let outcome = storage
        .update_project(
            project,
            UpdateProjectRequest {
                groups_creator: Some(GroupsCreator::Random),
                min_per_group: Some(4),
                max_per_group: Some(4),
                ..Default::default()
            },
        )
        .await
        .expect("regroup succeeds");

    assert_eq!(outcome.regrouped, Some(GroupsCreator::Random));
    assert!(!outcome.newly_published);

    let mut sizes: Vec<usize> = outcome
        .project
        .groups
        .iter()
        .map(|g| g.members.len())
        .collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(sizes, vec![4, 4, 2]);

    let assigned: Vec<Uuid> = outcome
        .project
        .groups
        .iter()
        .flat_map(|g| g.members.iter().copied())
        .collect();
    assert_eq!(assigned.len(), students.len());
    let unique: HashSet<Uuid> = assigned.into_iter().collect();
    assert_eq!(unique, students.into_iter().collect::<HashSet<_>>());
}

#[tokio::test]
async fn test_infeasible_regroup_leaves_project_untouched() {
    let storage = storage().await;
    let students: Vec<Uuid> = (0..9).map(|_| Uuid::new_v4()).collect();
    let batch = batch_of(&storage, "Small promo", students).await;
    let project = project_named(&storage, "Networks", Some(batch)).await;

    let outcome = storage
        .update_project(
            project,
            UpdateProjectRequest {
                name: Some("Networks II".into()),
                groups_creator: Some(GroupsCreator::Random),
                min_per_group: Some(3),
                max_per_group: Some(3),
                max_groups: Some(2),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(outcome, Err(PampError::BadRequest(_))));

    let detail = storage
        .get_project(project)
        .await
        .expect("query")
        .expect("project exists");
    assert_eq!(detail.project.name, "Networks");
    assert_eq!(detail.project.groups_creator, None);
    assert!(detail.groups.is_empty());
}

#[tokio::test]
async fn test_teacher_mode_creates_empty_skeleton_groups() {
    let storage = storage().await;
    let students: Vec<Uuid> = (0..7).map(|_| Uuid::new_v4()).collect();
    let batch = batch_of(&storage, "Skeleton promo", students).await;
    let project = project_named(&storage, "Databases", Some(batch)).await;

    let outcome = storage
        .update_project(
            project,
            UpdateProjectRequest {
                groups_creator: Some(GroupsCreator::Teacher),
                min_per_group: Some(3),
                max_per_group: Some(4),
                ..Default::default()
            },
        )
        .await
        .expect("skeleton groups");

    // ceil(7 / 3) = 3
    assert_eq!(outcome.project.groups.len(), 3);
    assert!(outcome.project.groups.iter().all(|g| g.members.is_empty()));
}

#[tokio::test]
async fn test_duplicate_group_name_is_rejected() {
    let storage = storage().await;
    let project = project_named(&storage, "Graphics", None).await;

    storage
        .create_groups(
            project,
            vec![NewGroup {
                name: "Team Rocket".into(),
                members: vec![Uuid::new_v4()],
            }],
        )
        .await
        .expect("first group");

    let duplicate = storage
        .create_groups(
            project,
            vec![NewGroup {
                name: "Team Rocket".into(),
                members: vec![Uuid::new_v4()],
            }],
        )
        .await;
    assert!(matches!(duplicate, Err(PampError::BadRequest(_))));
    assert_eq!(
        storage
            .list_project_groups(project)
            .await
            .expect("listing")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_group_update_and_report_submission() {
    let storage = storage().await;
    let project = project_named(&storage, "Security", None).await;
    let (alice, bob, eve) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let group = storage
        .create_groups(
            project,
            vec![NewGroup {
                name: "Blue".into(),
                members: vec![alice],
            }],
        )
        .await
        .expect("group")
        .remove(0);

    let updated = storage
        .update_group(
            group.id,
            UpdateGroupRequest {
                name: None,
                members: Some(vec![alice, bob]),
            },
        )
        .await
        .expect("members replaced");
    assert_eq!(updated.members, vec![alice, bob]);
    assert_eq!(updated.name, "Blue");

    assert!(matches!(
        storage.submit_group_report(group.id, eve).await,
        Err(PampError::Forbidden(_))
    ));

    let submitted = storage
        .submit_group_report(group.id, bob)
        .await
        .expect("member submits");
    assert!(submitted.report_submitted);
    assert!(submitted.report_submitted_at.is_some());

    assert!(matches!(
        storage.submit_group_report(group.id, alice).await,
        Err(PampError::BadRequest(_))
    ));

    let mine = storage.list_student_groups(bob).await.expect("bob's groups");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, group.id);
}

fn step(id: Option<Uuid>, name: &str) -> UpsertStepRequest {
    UpsertStepRequest {
        id,
        name: name.to_string(),
        description: String::new(),
        has_mandatory_submission: true,
        allow_submitting_after_deadline: false,
        submission_deadline: None,
    }
}

#[tokio::test]
async fn test_copy_project_copies_steps_not_groups() {
    let storage = storage().await;
    let batch = batch_of(&storage, "Copy promo", vec![Uuid::new_v4(), Uuid::new_v4()]).await;
    let project = project_named(&storage, "Operating Systems", Some(batch)).await;

    storage
        .upsert_project_steps(
            project,
            UpsertStepsRequest {
                steps: vec![
                    step(None, "Kickoff"),
                    step(None, "Midterm"),
                    step(None, "Defense"),
                ],
            },
        )
        .await
        .expect("steps saved");
    storage
        .create_groups(
            project,
            vec![NewGroup {
                name: "Kernel hackers".into(),
                members: Vec::new(),
            }],
        )
        .await
        .expect("group");

    let copy = storage.copy_project(project).await.expect("copy");
    assert_ne!(copy.project.id, project);
    assert_eq!(copy.project.name, "Operating Systems (Copy)");
    assert!(!copy.project.is_published);
    assert_eq!(copy.project.groups_creator, None);
    assert_eq!(copy.project.student_batch_id, None);
    assert!(copy.groups.is_empty());
    assert_eq!(
        copy.steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        vec!["Kickoff", "Midterm", "Defense"]
    );
    assert!(copy.steps.iter().all(|s| s.project_id == copy.project.id));

    // 再次复制同一项目会与已有副本重名
    assert!(matches!(
        storage.copy_project(project).await,
        Err(PampError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_upsert_steps_updates_inserts_and_deletes() {
    let storage = storage().await;
    let project = project_named(&storage, "Algorithms", None).await;

    let first = storage
        .upsert_project_steps(
            project,
            UpsertStepsRequest {
                steps: vec![step(None, "One"), step(None, "Two")],
            },
        )
        .await
        .expect("initial steps");

    let second = storage
        .upsert_project_steps(
            project,
            UpsertStepsRequest {
                steps: vec![step(None, "Zero"), step(Some(first[1].id), "Two (renamed)")],
            },
        )
        .await
        .expect("second upsert");

    assert_eq!(second.len(), 2);
    assert_eq!(second[0].name, "Zero");
    assert_eq!(second[1].id, first[1].id);
    assert_eq!(second[1].name, "Two (renamed)");
    assert_eq!(second[1].position, 1);

    assert!(matches!(
        storage
            .upsert_project_steps(
                project,
                UpsertStepsRequest {
                    steps: vec![step(Some(Uuid::new_v4()), "Ghost")],
                },
            )
            .await,
        Err(PampError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_deleting_batch_detaches_projects() {
    let storage = storage().await;
    let batch = batch_of(&storage, "Detached promo", vec![Uuid::new_v4()]).await;
    let project = project_named(&storage, "Compilers II", Some(batch)).await;

    storage
        .delete_student_batch(batch)
        .await
        .expect("batch deleted");

    let detail = storage
        .get_project(project)
        .await
        .expect("query")
        .expect("project survives");
    assert_eq!(detail.project.student_batch_id, None);
    assert!(storage.get_student_batch(batch).await.expect("query").is_none());
}

#[tokio::test]
async fn test_batch_roster_replacement_keeps_order() {
    let storage = storage().await;
    let batch = batch_of(&storage, "Ordered promo", vec![Uuid::new_v4()]).await;
    let roster: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

    let updated = storage
        .update_student_batch(
            batch,
            UpdateStudentBatchRequest {
                students: Some(roster.clone()),
                ..Default::default()
            },
        )
        .await
        .expect("roster replaced");
    assert_eq!(updated.students, roster);

    batch_of(&storage, "Other promo", Vec::new()).await;
    assert!(matches!(
        storage
            .update_student_batch(
                batch,
                UpdateStudentBatchRequest {
                    name: Some("Other promo".into()),
                    ..Default::default()
                },
            )
            .await,
        Err(PampError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_delete_project_removes_its_scales() {
    let storage = storage().await;
    let project = project_named(&storage, "Cleanup", None).await;
    let scale = storage
        .create_grading_scale(
            CreateGradingScaleRequest {
                scale_type: ScaleType::Report,
                target_id: Uuid::new_v4(),
                notation_mode: NotationMode::Group,
                title: "Report".into(),
                project_id: Some(project),
                criteria: vec![criterion("Clarity")],
            },
            Uuid::new_v4(),
        )
        .await
        .expect("scale");

    storage.delete_project(project).await.expect("deleted");
    assert!(storage.get_project(project).await.expect("query").is_none());
    assert!(
        storage
            .get_grading_scale(scale.id)
            .await
            .expect("query")
            .is_none()
    );
}

fn slot(group_id: Uuid, start: DateTime<Utc>) -> CreateOralRequest {
    CreateOralRequest {
        group_id,
        start_time: start,
        end_time: start + Duration::minutes(30),
    }
}

async fn two_groups(storage: &SeaOrmStorage, project: Uuid) -> (Uuid, Uuid) {
    let groups = storage
        .create_groups(
            project,
            vec![
                NewGroup {
                    name: "Alpha".into(),
                    members: vec![Uuid::new_v4()],
                },
                NewGroup {
                    name: "Beta".into(),
                    members: vec![Uuid::new_v4()],
                },
            ],
        )
        .await
        .expect("groups");
    (groups[0].id, groups[1].id)
}

#[tokio::test]
async fn test_each_group_has_at_most_one_oral() {
    let storage = storage().await;
    let project = project_named(&storage, "Operating Systems", None).await;
    let (alpha, beta) = two_groups(&storage, project).await;
    let morning = Utc.with_ymd_and_hms(2026, 6, 12, 9, 0, 0).unwrap();

    let late = storage
        .create_oral(slot(alpha, morning + Duration::hours(2)))
        .await
        .expect("first oral");
    assert_eq!(late.group_name, "Alpha");
    assert_eq!(late.project_id, project);

    match storage.create_oral(slot(alpha, morning)).await {
        Err(PampError::BadRequest(message)) => {
            assert!(message.contains("already an oral"), "{message}")
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }

    storage
        .create_oral(slot(beta, morning))
        .await
        .expect("oral for the other group");

    let names: Vec<String> = storage
        .list_project_orals(project)
        .await
        .expect("listing")
        .into_iter()
        .map(|oral| oral.group_name)
        .collect();
    assert_eq!(names, vec!["Beta".to_string(), "Alpha".to_string()]);

    let missing_group = storage.create_oral(slot(Uuid::new_v4(), morning)).await;
    assert!(matches!(missing_group, Err(PampError::NotFound(_))));
    let missing_project = storage.list_project_orals(Uuid::new_v4()).await;
    assert!(matches!(missing_project, Err(PampError::NotFound(_))));
}

#[tokio::test]
async fn test_oral_update_keeps_time_range_valid() {
    let storage = storage().await;
    let project = project_named(&storage, "Distributed Systems", None).await;
    let (alpha, _) = two_groups(&storage, project).await;
    let start = Utc.with_ymd_and_hms(2026, 6, 12, 14, 0, 0).unwrap();
    let oral = storage.create_oral(slot(alpha, start)).await.expect("oral");

    let rejected = storage
        .update_oral(
            oral.id,
            UpdateOralRequest {
                end_time: Some(start - Duration::minutes(5)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(rejected, Err(PampError::Validation(_))));

    let moved = storage
        .update_oral(
            oral.id,
            UpdateOralRequest {
                end_time: Some(start + Duration::hours(1)),
                ..Default::default()
            },
        )
        .await
        .expect("extended");
    assert_eq!(moved.start_time, start);
    assert_eq!(moved.end_time, start + Duration::hours(1));
    assert_eq!(moved.group_name, "Alpha");

    let missing = storage
        .update_oral(Uuid::new_v4(), UpdateOralRequest::default())
        .await;
    assert!(matches!(missing, Err(PampError::NotFound(_))));

    storage.delete_oral(oral.id).await.expect("deleted");
    assert!(storage.get_oral(oral.id).await.expect("query").is_none());
    assert!(matches!(
        storage.delete_oral(oral.id).await,
        Err(PampError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_orals_follow_their_groups() {
    let storage = storage().await;
    let project = project_named(&storage, "Robotics", None).await;
    let (alpha, beta) = two_groups(&storage, project).await;
    let start = Utc.with_ymd_and_hms(2026, 6, 13, 9, 0, 0).unwrap();
    let alpha_oral = storage.create_oral(slot(alpha, start)).await.expect("oral");
    let beta_oral = storage
        .create_oral(slot(beta, start + Duration::hours(1)))
        .await
        .expect("oral");

    storage.delete_group(alpha).await.expect("group deleted");
    assert!(storage.get_oral(alpha_oral.id).await.expect("query").is_none());
    assert!(storage.get_oral(beta_oral.id).await.expect("query").is_some());

    storage.delete_project(project).await.expect("project deleted");
    assert!(storage.get_oral(beta_oral.id).await.expect("query").is_none());
}
