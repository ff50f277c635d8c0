use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use super::entities::{GroupsCreator, Project};
use crate::errors::{PampError, Result};
use crate::models::common::PaginationQuery;
use crate::utils::validate;

fn check_sizes(
    max_groups: Option<i32>,
    max_per_group: Option<i32>,
    min_per_group: Option<i32>,
) -> Result<()> {
    for (field, value) in [
        ("maxGroups", max_groups),
        ("maxPerGroup", max_per_group),
        ("minPerGroup", min_per_group),
    ] {
        if let Some(value) = value {
            validate::validate_positive(value)
                .map_err(|e| PampError::validation(format!("{field} {e}")))?;
        }
    }
    Ok(())
}

// 创建项目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub student_batch_id: Option<Uuid>,
    pub max_groups: Option<i32>,
    pub max_per_group: Option<i32>,
    pub min_per_group: Option<i32>,
    pub creation_group_deadline: Option<DateTime<Utc>>,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> Result<()> {
        validate::validate_name(&self.name)
            .map_err(|e| PampError::validation(format!("Project name {e}")))?;
        check_sizes(self.max_groups, self.max_per_group, self.min_per_group)
    }
}

// 修改项目请求
//
// groups_creator / max_per_group / min_per_group 发生变化时会重新生成分组
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub student_batch_id: Option<Uuid>,
    pub max_groups: Option<i32>,
    pub max_per_group: Option<i32>,
    pub min_per_group: Option<i32>,
    pub groups_creator: Option<GroupsCreator>,
    pub creation_group_deadline: Option<DateTime<Utc>>,
}

impl UpdateProjectRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate::validate_name(name)
                .map_err(|e| PampError::validation(format!("Project name {e}")))?;
        }
        check_sizes(self.max_groups, self.max_per_group, self.min_per_group)
    }

    /// 与当前项目相比，分组相关字段是否有变化
    pub fn changes_grouping(&self, current: &Project) -> bool {
        let creator_changed = self
            .groups_creator
            .is_some_and(|c| current.groups_creator != Some(c));
        let max_changed = self
            .max_per_group
            .is_some_and(|v| current.max_per_group != Some(v));
        let min_changed = self
            .min_per_group
            .is_some_and(|v| current.min_per_group != Some(v));
        creator_changed || max_changed || min_changed
    }
}

// 项目列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/project.ts")]
pub struct ProjectListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
