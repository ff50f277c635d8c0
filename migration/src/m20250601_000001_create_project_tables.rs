use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学生批次（班级/届）表
        manager
            .create_table(
                Table::create()
                    .table(StudentBatches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentBatches::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentBatches::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StudentBatches::State)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(StudentBatches::Tags)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(StudentBatches::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentBatches::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 批次学生名单（有序）
        manager
            .create_table(
                Table::create()
                    .table(BatchStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BatchStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BatchStudents::BatchId).uuid().not_null())
                    .col(ColumnDef::new(BatchStudents::StudentId).uuid().not_null())
                    .col(ColumnDef::new(BatchStudents::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(BatchStudents::Table, BatchStudents::BatchId)
                            .to(StudentBatches::Table, StudentBatches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建项目表
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Projects::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(
                        ColumnDef::new(Projects::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Projects::CreatorId).uuid().null())
                    .col(ColumnDef::new(Projects::StudentBatchId).uuid().null())
                    .col(ColumnDef::new(Projects::MaxGroups).integer().null())
                    .col(ColumnDef::new(Projects::MaxPerGroup).integer().null())
                    .col(ColumnDef::new(Projects::MinPerGroup).integer().null())
                    .col(ColumnDef::new(Projects::GroupsCreator).string().null())
                    .col(
                        ColumnDef::new(Projects::CreationGroupDeadline)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Projects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Projects::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Projects::Table, Projects::StudentBatchId)
                            .to(StudentBatches::Table, StudentBatches::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建项目阶段表
        manager
            .create_table(
                Table::create()
                    .table(Steps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Steps::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Steps::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Steps::Name).string().not_null())
                    .col(ColumnDef::new(Steps::Description).text().not_null())
                    .col(
                        ColumnDef::new(Steps::HasMandatorySubmission)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Steps::AllowSubmittingAfterDeadline)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Steps::SubmissionDeadline)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Steps::Position).integer().not_null())
                    .col(ColumnDef::new(Steps::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Steps::Table, Steps::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建项目分组表
        manager
            .create_table(
                Table::create()
                    .table(ProjectGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectGroups::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProjectGroups::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ProjectGroups::Name).string().not_null())
                    .col(
                        ColumnDef::new(ProjectGroups::ReportSubmitted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProjectGroups::ReportSubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProjectGroups::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProjectGroups::Table, ProjectGroups::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 分组成员（有序）
        manager
            .create_table(
                Table::create()
                    .table(GroupMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GroupMembers::GroupId).uuid().not_null())
                    .col(ColumnDef::new(GroupMembers::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(GroupMembers::StudentId).uuid().not_null())
                    .col(ColumnDef::new(GroupMembers::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupMembers::Table, GroupMembers::GroupId)
                            .to(ProjectGroups::Table, ProjectGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupMembers::Table, GroupMembers::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_batch_students_batch_student")
                    .table(BatchStudents::Table)
                    .col(BatchStudents::BatchId)
                    .col(BatchStudents::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_project_groups_project_name")
                    .table(ProjectGroups::Table)
                    .col(ProjectGroups::ProjectId)
                    .col(ProjectGroups::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_group_members_group_student")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::GroupId)
                    .col(GroupMembers::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_group_members_project_student")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::ProjectId)
                    .col(GroupMembers::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 普通索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_creator_id")
                    .table(Projects::Table)
                    .col(Projects::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_steps_project_id")
                    .table(Steps::Table)
                    .col(Steps::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_group_members_student_id")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(GroupMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Steps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BatchStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentBatches::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum StudentBatches {
    #[sea_orm(iden = "student_batches")]
    Table,
    Id,
    Name,
    State,
    Tags,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BatchStudents {
    #[sea_orm(iden = "batch_students")]
    Table,
    Id,
    BatchId,
    StudentId,
    Position,
}

#[derive(DeriveIden)]
enum Projects {
    #[sea_orm(iden = "projects")]
    Table,
    Id,
    Name,
    Description,
    IsPublished,
    CreatorId,
    StudentBatchId,
    MaxGroups,
    MaxPerGroup,
    MinPerGroup,
    GroupsCreator,
    CreationGroupDeadline,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Steps {
    #[sea_orm(iden = "steps")]
    Table,
    Id,
    ProjectId,
    Name,
    Description,
    HasMandatorySubmission,
    AllowSubmittingAfterDeadline,
    SubmissionDeadline,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProjectGroups {
    #[sea_orm(iden = "project_groups")]
    Table,
    Id,
    ProjectId,
    Name,
    ReportSubmitted,
    ReportSubmittedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupMembers {
    #[sea_orm(iden = "group_members")]
    Table,
    Id,
    GroupId,
    ProjectId,
    StudentId,
    Position,
}
