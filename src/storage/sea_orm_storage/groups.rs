//! 项目分组存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use super::orals::{delete_group_oral, delete_project_orals};
use crate::entity::group_members::Column as MemberColumn;
use crate::entity::prelude::*;
use crate::entity::project_groups::Column as GroupColumn;
use crate::errors::{PampError, Result};
use crate::models::groups::{
    entities::{NewGroup, ProjectGroup},
    requests::UpdateGroupRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

fn group_not_found(group_id: Uuid) -> PampError {
    PampError::not_found(format!("Group '{group_id}' not found"))
}

/// 为若干分组加载有序成员
pub(super) async fn attach_members<C: ConnectionTrait>(
    conn: &C,
    groups: Vec<ProjectGroupModel>,
) -> Result<Vec<ProjectGroup>> {
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for member in GroupMembers::find()
        .filter(MemberColumn::GroupId.is_in(groups.iter().map(|g| g.id)))
        .order_by_asc(MemberColumn::Position)
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询分组成员失败: {e}")))?
    {
        members
            .entry(member.group_id)
            .or_default()
            .push(member.student_id);
    }

    Ok(groups
        .into_iter()
        .map(|g| {
            let own = members.remove(&g.id).unwrap_or_default();
            g.into_group(own)
        })
        .collect())
}

/// 项目的全部分组（按创建顺序）
pub(super) async fn load_project_groups<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<Vec<ProjectGroup>> {
    let groups = ProjectGroups::find()
        .filter(GroupColumn::ProjectId.eq(project_id))
        .order_by_asc(GroupColumn::CreatedAt)
        .order_by_asc(GroupColumn::Name)
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?;

    attach_members(conn, groups).await
}

async fn write_members<C: ConnectionTrait>(
    conn: &C,
    group_id: Uuid,
    project_id: Uuid,
    members: &[Uuid],
) -> Result<()> {
    for (position, student_id) in members.iter().enumerate() {
        GroupMemberActiveModel {
            group_id: Set(group_id),
            project_id: Set(project_id),
            student_id: Set(*student_id),
            position: Set(position as i32),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("添加分组成员失败: {e}")))?;
    }
    Ok(())
}

/// 写入一组新分组；与项目现有分组重名或成员冲突时返回 BadRequest
pub(super) async fn insert_groups<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    groups: Vec<NewGroup>,
) -> Result<Vec<ProjectGroup>> {
    let existing = ProjectGroups::find()
        .filter(GroupColumn::ProjectId.eq(project_id))
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?;
    let mut names: HashSet<String> = existing.into_iter().map(|g| g.name).collect();

    let mut assigned: HashSet<Uuid> = GroupMembers::find()
        .filter(MemberColumn::ProjectId.eq(project_id))
        .all(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询分组成员失败: {e}")))?
        .into_iter()
        .map(|m| m.student_id)
        .collect();

    let now = chrono::Utc::now().timestamp();
    let mut created = Vec::with_capacity(groups.len());
    for group in groups {
        if !names.insert(group.name.clone()) {
            return Err(PampError::bad_request(format!(
                "A group named '{}' already exists in this project",
                group.name
            )));
        }
        if let Some(student) = group.members.iter().find(|s| !assigned.insert(**s)) {
            return Err(PampError::bad_request(format!(
                "Student {student} already belongs to a group in this project"
            )));
        }

        let model = ProjectGroupActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            name: Set(group.name),
            report_submitted: Set(false),
            report_submitted_at: Set(None),
            created_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("创建分组失败: {e}")))?;

        write_members(conn, model.id, project_id, &group.members).await?;
        created.push(model.into_group(group.members));
    }
    Ok(created)
}

/// 删除项目的全部分组、成员关系与答辩
pub(super) async fn delete_project_groups<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<()> {
    delete_project_orals(conn, project_id).await?;

    GroupMembers::delete_many()
        .filter(MemberColumn::ProjectId.eq(project_id))
        .exec(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("删除分组成员失败: {e}")))?;

    ProjectGroups::delete_many()
        .filter(GroupColumn::ProjectId.eq(project_id))
        .exec(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("删除分组失败: {e}")))?;
    Ok(())
}

async fn find_group<C: ConnectionTrait>(conn: &C, group_id: Uuid) -> Result<ProjectGroupModel> {
    ProjectGroups::find_by_id(group_id)
        .one(conn)
        .await
        .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?
        .ok_or_else(|| group_not_found(group_id))
}

impl SeaOrmStorage {
    /// 为项目批量创建分组
    pub async fn create_groups_impl(
        &self,
        project_id: Uuid,
        groups: Vec<NewGroup>,
    ) -> Result<Vec<ProjectGroup>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        Projects::find_by_id(project_id)
            .one(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("查询项目失败: {e}")))?
            .ok_or_else(|| PampError::not_found(format!("Project '{project_id}' not found")))?;

        let created = insert_groups(&txn, project_id, groups).await?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Created {} groups in project {}", created.len(), project_id);
        Ok(created)
    }

    /// 列出项目分组
    pub async fn list_project_groups_impl(&self, project_id: Uuid) -> Result<Vec<ProjectGroup>> {
        load_project_groups(&self.db, project_id).await
    }

    /// 列出学生所在的分组
    pub async fn list_student_groups_impl(&self, student_id: Uuid) -> Result<Vec<ProjectGroup>> {
        let group_ids: Vec<Uuid> = GroupMembers::find()
            .filter(MemberColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询分组成员失败: {e}")))?
            .into_iter()
            .map(|m| m.group_id)
            .collect();

        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let groups = ProjectGroups::find()
            .filter(GroupColumn::Id.is_in(group_ids))
            .order_by_asc(GroupColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?;

        attach_members(&self.db, groups).await
    }

    /// 获取分组
    pub async fn get_group_impl(&self, group_id: Uuid) -> Result<Option<ProjectGroup>> {
        let group = ProjectGroups::find_by_id(group_id)
            .one(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?;

        match group {
            Some(group) => Ok(attach_members(&self.db, vec![group]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 修改分组名称或整体替换成员
    pub async fn update_group_impl(
        &self,
        group_id: Uuid,
        req: UpdateGroupRequest,
    ) -> Result<ProjectGroup> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let group = find_group(&txn, group_id).await?;

        let mut renamed = None;
        if let Some(name) = req.name {
            let name = name.trim().to_string();
            let taken = ProjectGroups::find()
                .filter(GroupColumn::ProjectId.eq(group.project_id))
                .filter(GroupColumn::Name.eq(name.as_str()))
                .filter(GroupColumn::Id.ne(group.id))
                .one(&txn)
                .await
                .map_err(|e| PampError::database_operation(format!("查询分组失败: {e}")))?;
            if taken.is_some() {
                return Err(PampError::bad_request(format!(
                    "A group named '{name}' already exists in this project"
                )));
            }
            renamed = Some(name);
        }

        if let Some(members) = req.members {
            let elsewhere = GroupMembers::find()
                .filter(MemberColumn::ProjectId.eq(group.project_id))
                .filter(MemberColumn::GroupId.ne(group.id))
                .filter(MemberColumn::StudentId.is_in(members.clone()))
                .one(&txn)
                .await
                .map_err(|e| PampError::database_operation(format!("查询分组成员失败: {e}")))?;
            if let Some(conflict) = elsewhere {
                return Err(PampError::bad_request(format!(
                    "Student {} already belongs to another group in this project",
                    conflict.student_id
                )));
            }

            GroupMembers::delete_many()
                .filter(MemberColumn::GroupId.eq(group.id))
                .exec(&txn)
                .await
                .map_err(|e| PampError::database_operation(format!("删除分组成员失败: {e}")))?;
            write_members(&txn, group.id, group.project_id, &members).await?;
        }

        let updated = if let Some(name) = renamed {
            ProjectGroupActiveModel {
                id: Set(group.id),
                name: Set(name),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("更新分组失败: {e}")))?
        } else {
            group
        };

        let mut groups = attach_members(&txn, vec![updated]).await?;
        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        groups.pop().ok_or_else(|| group_not_found(group_id))
    }

    /// 删除分组及成员关系
    pub async fn delete_group_impl(&self, group_id: Uuid) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PampError::database_operation(format!("开启事务失败: {e}")))?;

        let group = find_group(&txn, group_id).await?;

        delete_group_oral(&txn, group.id).await?;
        GroupMembers::delete_many()
            .filter(MemberColumn::GroupId.eq(group.id))
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("删除分组成员失败: {e}")))?;
        ProjectGroups::delete_by_id(group.id)
            .exec(&txn)
            .await
            .map_err(|e| PampError::database_operation(format!("删除分组失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PampError::database_operation(format!("提交事务失败: {e}")))?;

        debug!("Group {} deleted", group_id);
        Ok(())
    }

    /// 组员提交报告；非组员返回 Forbidden，重复提交返回 BadRequest
    pub async fn submit_group_report_impl(
        &self,
        group_id: Uuid,
        student_id: Uuid,
    ) -> Result<ProjectGroup> {
        let group = find_group(&self.db, group_id).await?;

        let membership = GroupMembers::find()
            .filter(MemberColumn::GroupId.eq(group.id))
            .filter(MemberColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("查询分组成员失败: {e}")))?;
        if membership.is_none() {
            return Err(PampError::forbidden("Only group members can submit the report"));
        }

        let now = chrono::Utc::now().timestamp();
        let outcome = ProjectGroups::update_many()
            .col_expr(GroupColumn::ReportSubmitted, sea_orm::sea_query::Expr::value(true))
            .col_expr(
                GroupColumn::ReportSubmittedAt,
                sea_orm::sea_query::Expr::value(Some(now)),
            )
            .filter(GroupColumn::Id.eq(group.id))
            .filter(GroupColumn::ReportSubmitted.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| PampError::database_operation(format!("提交报告失败: {e}")))?;
        if outcome.rows_affected == 0 {
            return Err(PampError::bad_request(
                "The report has already been submitted for this group",
            ));
        }

        info!("Group {} report submitted by {}", group_id, student_id);
        let group = find_group(&self.db, group_id).await?;
        attach_members(&self.db, vec![group])
            .await?
            .pop()
            .ok_or_else(|| group_not_found(group_id))
    }
}
