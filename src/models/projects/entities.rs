use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::groups::entities::ProjectGroup;
use crate::models::steps::entities::Step;

// 分组方式：教师指定、学生自选或随机分配
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub enum GroupsCreator {
    Teacher,
    Student,
    Random,
}

impl std::fmt::Display for GroupsCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupsCreator::Teacher => f.write_str("TEACHER"),
            GroupsCreator::Student => f.write_str("STUDENT"),
            GroupsCreator::Random => f.write_str("RANDOM"),
        }
    }
}

impl std::str::FromStr for GroupsCreator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEACHER" => Ok(GroupsCreator::Teacher),
            "STUDENT" => Ok(GroupsCreator::Student),
            "RANDOM" => Ok(GroupsCreator::Random),
            _ => Err(format!("Invalid groups creator: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_published: bool,
    pub creator_id: Option<Uuid>,
    pub student_batch_id: Option<Uuid>,
    pub max_groups: Option<i32>,
    pub max_per_group: Option<i32>,
    pub min_per_group: Option<i32>,
    pub groups_creator: Option<GroupsCreator>,
    pub creation_group_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 项目详情，附带分组与阶段
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct ProjectDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub project: Project,
    pub groups: Vec<ProjectGroup>,
    pub steps: Vec<Step>,
}
