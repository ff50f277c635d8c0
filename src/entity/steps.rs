//! 项目阶段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub has_mandatory_submission: bool,
    pub allow_submitting_after_deadline: bool,
    pub submission_deadline: Option<i64>,
    pub position: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_step(self) -> crate::models::steps::entities::Step {
        use crate::models::steps::entities::Step;
        use chrono::{DateTime, Utc};

        Step {
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            description: self.description,
            has_mandatory_submission: self.has_mandatory_submission,
            allow_submitting_after_deadline: self.allow_submitting_after_deadline,
            submission_deadline: self
                .submission_deadline
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            position: self.position,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
