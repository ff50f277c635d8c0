//! 答辩时段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub group_id: Uuid,
    pub project_id: Uuid,
    pub start_time: i64,
    pub end_time: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_groups::Entity",
        from = "Column::GroupId",
        to = "super::project_groups::Column::Id"
    )]
    Group,
}

impl Related<super::project_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_oral(self, group_name: String) -> crate::models::orals::entities::Oral {
        use crate::models::orals::entities::Oral;
        use chrono::{DateTime, Utc};

        let at = |ts: i64| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default();
        Oral {
            id: self.id,
            group_id: self.group_id,
            group_name,
            project_id: self.project_id,
            start_time: at(self.start_time),
            end_time: at(self.end_time),
            created_at: at(self.created_at),
            updated_at: at(self.updated_at),
        }
    }
}
