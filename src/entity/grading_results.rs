//! 评分结果实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub criterion_id: Uuid,
    pub target_group_id: Option<Uuid>,
    pub target_student_id: Option<Uuid>,
    pub score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_by: Uuid,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grading_criteria::Entity",
        from = "Column::CriterionId",
        to = "super::grading_criteria::Column::Id"
    )]
    Criterion,
}

impl Related<super::grading_criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criterion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_result(self) -> crate::models::grading::entities::GradingResult {
        use crate::models::grading::entities::GradingResult;
        use chrono::{DateTime, Utc};

        GradingResult {
            id: self.id,
            criterion_id: self.criterion_id,
            target_group_id: self.target_group_id,
            target_student_id: self.target_student_id,
            score: self.score,
            comment: self.comment,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
