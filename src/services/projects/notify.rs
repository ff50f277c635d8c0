//! 项目发布与随机分组后的邮件通知
//!
//! 通知在项目修改提交之后计算，用户信息通过目录服务按调用方凭证查询。
//! 整个过程在后台任务中完成，任何失败只记录日志。

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clients::{EmailNotification, Mailer, UserDirectory, mailer::ProjectRef};
use crate::models::projects::entities::GroupsCreator;
use crate::storage::{ProjectUpdateOutcome, Storage};

/// 发给单个学生的通知类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Assigned { group_id: Uuid, group_name: String },
    Join,
    Pending,
}

/// 计算每个学生应收到的通知
///
/// 新发布时通知批次中的每个学生；仅随机重新分组时只通知组员。
/// 两者同时发生时每个学生只收到一封。
pub fn plan_notices(outcome: &ProjectUpdateOutcome, roster: &[Uuid]) -> Vec<(Uuid, NoticeKind)> {
    let mut membership: HashMap<Uuid, (Uuid, &str)> = HashMap::new();
    for group in &outcome.project.groups {
        for member in &group.members {
            membership.insert(*member, (group.id, group.name.as_str()));
        }
    }

    let assigned = |student: Uuid| {
        membership
            .get(&student)
            .map(|(group_id, name)| NoticeKind::Assigned {
                group_id: *group_id,
                group_name: (*name).to_string(),
            })
    };

    if outcome.newly_published {
        let creator = outcome.project.project.groups_creator;
        return roster
            .iter()
            .map(|student| {
                let kind = assigned(*student).unwrap_or(match creator {
                    Some(GroupsCreator::Student) => NoticeKind::Join,
                    _ => NoticeKind::Pending,
                });
                (*student, kind)
            })
            .collect();
    }

    // 草稿项目的分组变化不通知学生
    if outcome.regrouped == Some(GroupsCreator::Random) && outcome.project.project.is_published {
        return outcome
            .project
            .groups
            .iter()
            .flat_map(|group| group.members.iter())
            .filter_map(|student| assigned(*student).map(|kind| (*student, kind)))
            .collect();
    }

    Vec::new()
}

/// 在后台解析收件人并发送通知
pub fn spawn_project_notifications(
    storage: Arc<dyn Storage>,
    directory: Arc<dyn UserDirectory>,
    mailer: Arc<Mailer>,
    authorization: String,
    outcome: ProjectUpdateOutcome,
) {
    if !mailer.is_enabled() {
        debug!(
            "Notifications disabled, project {} update is silent",
            outcome.project.project.id
        );
        return;
    }

    tokio::spawn(async move {
        let project = &outcome.project.project;
        let roster = match project.student_batch_id {
            Some(batch_id) => match storage.get_student_batch(batch_id).await {
                Ok(Some(batch)) => batch.students,
                Ok(None) => Vec::new(),
                Err(e) => {
                    warn!("Failed to load roster for project {}: {}", project.id, e);
                    return;
                }
            },
            None => Vec::new(),
        };

        let project_ref = ProjectRef {
            id: project.id,
            name: &project.name,
        };
        let mut mails: Vec<EmailNotification> = Vec::new();
        for (student_id, kind) in plan_notices(&outcome, &roster) {
            let student = match directory.find_user(&authorization, student_id).await {
                Ok(Some(student)) => student,
                Ok(None) => {
                    warn!("Student {} is unknown to the user directory", student_id);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to resolve student {}: {}", student_id, e);
                    continue;
                }
            };
            mails.push(match kind {
                NoticeKind::Assigned {
                    group_id,
                    group_name,
                } => mailer.group_assigned(&student, project_ref, group_id, &group_name),
                NoticeKind::Join => mailer.group_join(&student, project_ref),
                NoticeKind::Pending => mailer.group_pending(&student, project_ref),
            });
        }

        debug!("Dispatching {} notifications for project {}", mails.len(), project.id);
        mailer.dispatch(mails);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::groups::entities::ProjectGroup;
    use crate::models::projects::entities::{Project, ProjectDetail};
    use chrono::Utc;

    fn outcome(
        creator: Option<GroupsCreator>,
        groups: Vec<ProjectGroup>,
        is_published: bool,
        newly_published: bool,
        regrouped: Option<GroupsCreator>,
    ) -> ProjectUpdateOutcome {
        ProjectUpdateOutcome {
            project: ProjectDetail {
                project: Project {
                    id: Uuid::new_v4(),
                    name: "Compilers".into(),
                    description: String::new(),
                    is_published,
                    creator_id: Some(Uuid::new_v4()),
                    student_batch_id: Some(Uuid::new_v4()),
                    max_groups: None,
                    max_per_group: Some(2),
                    min_per_group: Some(2),
                    groups_creator: creator,
                    creation_group_deadline: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
                groups,
                steps: Vec::new(),
            },
            regrouped,
            newly_published,
        }
    }

    fn group(name: &str, members: Vec<Uuid>) -> ProjectGroup {
        ProjectGroup {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: name.into(),
            members,
            report_submitted: false,
            report_submitted_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_publish_with_student_creation_sends_join() {
        let roster = vec![Uuid::new_v4(), Uuid::new_v4()];
        let out = outcome(Some(GroupsCreator::Student), Vec::new(), true, true, None);
        let notices = plan_notices(&out, &roster);
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|(_, kind)| *kind == NoticeKind::Join));
    }

    #[test]
    fn test_publish_with_teacher_creation_sends_pending() {
        let roster = vec![Uuid::new_v4()];
        let out = outcome(Some(GroupsCreator::Teacher), Vec::new(), true, true, None);
        assert_eq!(plan_notices(&out, &roster), vec![(roster[0], NoticeKind::Pending)]);
    }

    #[test]
    fn test_publish_and_random_regroup_sends_one_mail_each() {
        let roster: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let groups = vec![
            group("Group 1", vec![roster[0], roster[1]]),
            group("Group 2", vec![roster[2]]),
        ];
        let out = outcome(
            Some(GroupsCreator::Random),
            groups,
            true,
            true,
            Some(GroupsCreator::Random),
        );

        let notices = plan_notices(&out, &roster);
        assert_eq!(notices.len(), 3);
        assert!(matches!(
            &notices[2].1,
            NoticeKind::Assigned { group_name, .. } if group_name == "Group 2"
        ));
    }

    #[test]
    fn test_random_regroup_of_draft_is_silent() {
        let student = Uuid::new_v4();
        let out = outcome(
            Some(GroupsCreator::Random),
            vec![group("Group 1", vec![student])],
            false,
            false,
            Some(GroupsCreator::Random),
        );
        assert!(plan_notices(&out, &[student]).is_empty());
    }

    #[test]
    fn test_random_regroup_of_published_project_notifies_members() {
        let members = vec![Uuid::new_v4(), Uuid::new_v4()];
        let out = outcome(
            Some(GroupsCreator::Random),
            vec![group("Group 1", members.clone())],
            true,
            false,
            Some(GroupsCreator::Random),
        );
        let notices = plan_notices(&out, &[]);
        assert_eq!(
            notices.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            members
        );
    }
}
