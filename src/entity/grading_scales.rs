//! 评分表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_scales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub scale_type: String,
    pub target_id: Uuid,
    pub notation_mode: String,
    pub title: String,
    pub is_validated: bool,
    pub validated_at: Option<i64>,
    pub created_by: Uuid,
    pub project_id: Option<Uuid>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grading_criteria::Entity")]
    Criteria,
}

impl Related<super::grading_criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型（不含评分标准）
impl Model {
    pub fn state(&self) -> crate::models::grading::entities::ScaleState {
        crate::models::grading::entities::ScaleState::from_columns(
            self.is_validated,
            self.validated_at,
        )
    }

    pub fn into_grading_scale(
        self,
        criteria: Vec<crate::models::grading::entities::GradingCriterion>,
    ) -> crate::models::grading::entities::GradingScale {
        use crate::models::grading::entities::{GradingScale, NotationMode, ScaleType};
        use chrono::{DateTime, Utc};

        let state = self.state();
        GradingScale {
            id: self.id,
            scale_type: self
                .scale_type
                .parse::<ScaleType>()
                .unwrap_or(ScaleType::Deliverable),
            target_id: self.target_id,
            notation_mode: self
                .notation_mode
                .parse::<NotationMode>()
                .unwrap_or(NotationMode::Group),
            title: self.title,
            is_validated: state.is_validated(),
            validated_at: state.validated_at(),
            created_by: self.created_by,
            project_id: self.project_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            criteria,
        }
    }
}
