//! 评分标准实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_criteria")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub scale_id: Uuid,
    pub label: String,
    pub max_points: f64,
    pub weight: Option<f64>,
    pub comment_enabled: bool,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grading_scales::Entity",
        from = "Column::ScaleId",
        to = "super::grading_scales::Column::Id"
    )]
    Scale,
    #[sea_orm(has_many = "super::grading_results::Entity")]
    Results,
}

impl Related<super::grading_scales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scale.def()
    }
}

impl Related<super::grading_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_criterion(
        self,
        results: Vec<crate::models::grading::entities::GradingResult>,
    ) -> crate::models::grading::entities::GradingCriterion {
        crate::models::grading::entities::GradingCriterion {
            id: self.id,
            scale_id: self.scale_id,
            label: self.label,
            max_points: self.max_points,
            weight: self.weight,
            comment_enabled: self.comment_enabled,
            position: self.position,
            results,
        }
    }
}
