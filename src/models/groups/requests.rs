use serde::Deserialize;
use std::collections::HashSet;
use ts_rs::TS;
use uuid::Uuid;

use super::entities::NewGroup;
use crate::errors::{PampError, Result};
use crate::utils::validate;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct CreateGroupItem {
    pub name: String,
    #[serde(default)]
    pub members: Vec<Uuid>,
}

// 批量创建分组
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct CreateGroupsRequest {
    pub groups: Vec<CreateGroupItem>,
}

impl CreateGroupsRequest {
    /// 校验并转换为待写入分组；同一请求内的重名与重复成员直接拒绝
    pub fn into_new_groups(self) -> Result<Vec<NewGroup>> {
        if self.groups.is_empty() {
            return Err(PampError::validation("groups must not be empty"));
        }
        let mut names = HashSet::new();
        let mut students = HashSet::new();
        let mut groups = Vec::with_capacity(self.groups.len());
        for item in self.groups {
            validate::validate_name(&item.name)
                .map_err(|e| PampError::validation(format!("Group name {e}")))?;
            let name = item.name.trim().to_string();
            if !names.insert(name.clone()) {
                return Err(PampError::bad_request(format!(
                    "A group named '{name}' already exists in this project"
                )));
            }
            for member in &item.members {
                if !students.insert(*member) {
                    return Err(PampError::validation(format!(
                        "Student {member} is assigned to more than one group"
                    )));
                }
            }
            groups.push(NewGroup {
                name,
                members: item.members,
            });
        }
        Ok(groups)
    }
}

// 修改分组；members 存在时整体替换
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub members: Option<Vec<Uuid>>,
}

impl UpdateGroupRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate::validate_name(name)
                .map_err(|e| PampError::validation(format!("Group name {e}")))?;
        }
        if let Some(members) = &self.members {
            let mut seen = HashSet::with_capacity(members.len());
            if let Some(dup) = members.iter().find(|id| !seen.insert(**id)) {
                return Err(PampError::validation(format!(
                    "Student {dup} appears more than once in the group"
                )));
            }
        }
        Ok(())
    }
}
