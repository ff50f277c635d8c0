//! 项目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_published: bool,
    pub creator_id: Option<Uuid>,
    pub student_batch_id: Option<Uuid>,
    pub max_groups: Option<i32>,
    pub max_per_group: Option<i32>,
    pub min_per_group: Option<i32>,
    pub groups_creator: Option<String>,
    pub creation_group_deadline: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_batches::Entity",
        from = "Column::StudentBatchId",
        to = "super::student_batches::Column::Id"
    )]
    StudentBatch,
    #[sea_orm(has_many = "super::project_groups::Entity")]
    Groups,
    #[sea_orm(has_many = "super::steps::Entity")]
    Steps,
}

impl Related<super::student_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentBatch.def()
    }
}

impl Related<super::project_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::steps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_project(self) -> crate::models::projects::entities::Project {
        use crate::models::projects::entities::{GroupsCreator, Project};
        use chrono::{DateTime, Utc};

        Project {
            id: self.id,
            name: self.name,
            description: self.description,
            is_published: self.is_published,
            creator_id: self.creator_id,
            student_batch_id: self.student_batch_id,
            max_groups: self.max_groups,
            max_per_group: self.max_per_group,
            min_per_group: self.min_per_group,
            groups_creator: self
                .groups_creator
                .and_then(|c| c.parse::<GroupsCreator>().ok()),
            creation_group_deadline: self
                .creation_group_deadline
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
