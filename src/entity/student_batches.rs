//! 学生批次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub state: String,
    pub tags: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batch_students::Entity")]
    Students,
    #[sea_orm(has_many = "super::projects::Entity")]
    Projects,
}

impl Related<super::batch_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `students` 需已按 position 排序
    pub fn into_batch(self, students: Vec<Uuid>) -> crate::models::student_batches::entities::StudentBatch {
        use crate::models::student_batches::entities::{BatchState, StudentBatch};
        use chrono::{DateTime, Utc};

        StudentBatch {
            id: self.id,
            name: self.name,
            state: self.state.parse::<BatchState>().unwrap_or_default(),
            tags: self.tags,
            students,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
