use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 评分表
        manager
            .create_table(
                Table::create()
                    .table(GradingScales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradingScales::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradingScales::ScaleType).string().not_null())
                    .col(ColumnDef::new(GradingScales::TargetId).uuid().not_null())
                    .col(
                        ColumnDef::new(GradingScales::NotationMode)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradingScales::Title).string().not_null())
                    .col(
                        ColumnDef::new(GradingScales::IsValidated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GradingScales::ValidatedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(GradingScales::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(GradingScales::ProjectId).uuid().null())
                    .col(
                        ColumnDef::new(GradingScales::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradingScales::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 评分标准
        manager
            .create_table(
                Table::create()
                    .table(GradingCriteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradingCriteria::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradingCriteria::ScaleId).uuid().not_null())
                    .col(ColumnDef::new(GradingCriteria::Label).string().not_null())
                    .col(
                        ColumnDef::new(GradingCriteria::MaxPoints)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradingCriteria::Weight).double().null())
                    .col(
                        ColumnDef::new(GradingCriteria::CommentEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GradingCriteria::Position)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradingCriteria::Table, GradingCriteria::ScaleId)
                            .to(GradingScales::Table, GradingScales::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 评分结果
        manager
            .create_table(
                Table::create()
                    .table(GradingResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradingResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradingResults::CriterionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradingResults::TargetGroupId)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GradingResults::TargetStudentId)
                            .uuid()
                            .null(),
                    )
                    .col(ColumnDef::new(GradingResults::Score).double().not_null())
                    .col(ColumnDef::new(GradingResults::Comment).text().null())
                    .col(ColumnDef::new(GradingResults::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(GradingResults::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradingResults::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradingResults::Table, GradingResults::CriterionId)
                            .to(GradingCriteria::Table, GradingCriteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grading_scales_project_id")
                    .table(GradingScales::Table)
                    .col(GradingScales::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grading_criteria_scale_id")
                    .table(GradingCriteria::Table)
                    .col(GradingCriteria::ScaleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grading_results_criterion_id")
                    .table(GradingResults::Table)
                    .col(GradingResults::CriterionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GradingResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradingCriteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradingScales::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum GradingScales {
    #[sea_orm(iden = "grading_scales")]
    Table,
    Id,
    ScaleType,
    TargetId,
    NotationMode,
    Title,
    IsValidated,
    ValidatedAt,
    CreatedBy,
    ProjectId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GradingCriteria {
    #[sea_orm(iden = "grading_criteria")]
    Table,
    Id,
    ScaleId,
    Label,
    MaxPoints,
    Weight,
    CommentEnabled,
    Position,
}

#[derive(DeriveIden)]
enum GradingResults {
    #[sea_orm(iden = "grading_results")]
    Table,
    Id,
    CriterionId,
    TargetGroupId,
    TargetStudentId,
    Score,
    Comment,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
