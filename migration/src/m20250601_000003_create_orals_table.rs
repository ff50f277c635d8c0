use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 答辩时段，每个分组至多一个
        manager
            .create_table(
                Table::create()
                    .table(Orals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Orals::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Orals::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Orals::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Orals::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Orals::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Orals::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Orals::Table, Orals::GroupId)
                            .to(ProjectGroups::Table, ProjectGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Orals::Table, Orals::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_orals_group_id")
                    .table(Orals::Table)
                    .col(Orals::GroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orals_project_start")
                    .table(Orals::Table)
                    .col(Orals::ProjectId)
                    .col(Orals::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orals {
    #[sea_orm(iden = "orals")]
    Table,
    Id,
    GroupId,
    ProjectId,
    StartTime,
    EndTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProjectGroups {
    #[sea_orm(iden = "project_groups")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Projects {
    #[sea_orm(iden = "projects")]
    Table,
    Id,
}
