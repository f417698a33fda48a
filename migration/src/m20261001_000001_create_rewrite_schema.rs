// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Content items are owned by the ingestion side; the engine only reads them
        manager
            .create_table(
                Table::create()
                    .table(ContentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentItems::Title).string().not_null())
                    .col(ColumnDef::new(ContentItems::Url).string())
                    .col(
                        ColumnDef::new(ContentItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OriginalSources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OriginalSources::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OriginalSources::ContentId).uuid().not_null())
                    .col(ColumnDef::new(OriginalSources::Title).string().not_null())
                    .col(ColumnDef::new(OriginalSources::Html).text().not_null())
                    .col(ColumnDef::new(OriginalSources::Author).string())
                    .col(ColumnDef::new(OriginalSources::SourceUrl).string().not_null())
                    .col(
                        ColumnDef::new(OriginalSources::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Write-once cache: one source per content item
        manager
            .create_index(
                Index::create()
                    .name("idx_original_sources_content_id")
                    .table(OriginalSources::Table)
                    .col(OriginalSources::ContentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RewriteTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewriteTasks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RewriteTasks::ContentId).uuid().not_null())
                    .col(ColumnDef::new(RewriteTasks::AiModel).string().not_null())
                    .col(ColumnDef::new(RewriteTasks::PromptTemplate).text().not_null())
                    .col(ColumnDef::new(RewriteTasks::Status).string().not_null())
                    .col(ColumnDef::new(RewriteTasks::ErrorMessage).text())
                    .col(
                        ColumnDef::new(RewriteTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(RewriteTasks::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(RewriteTasks::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(RewriteTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rewrite_tasks_content_id")
                    .table(RewriteTasks::Table)
                    .col(RewriteTasks::ContentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RewriteResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewriteResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RewriteResults::TaskId).uuid().not_null())
                    .col(ColumnDef::new(RewriteResults::Version).integer().not_null())
                    .col(ColumnDef::new(RewriteResults::Title).string().not_null())
                    .col(ColumnDef::new(RewriteResults::ContentHtml).text().not_null())
                    .col(ColumnDef::new(RewriteResults::ContentText).text().not_null())
                    .col(
                        ColumnDef::new(RewriteResults::IsEdited)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(RewriteResults::EditedContentHtml).text())
                    .col(
                        ColumnDef::new(RewriteResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RewriteResults::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Versions are unique per task
        manager
            .create_index(
                Index::create()
                    .name("idx_rewrite_results_task_version")
                    .table(RewriteResults::Table)
                    .col(RewriteResults::TaskId)
                    .col(RewriteResults::Version)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RewriteResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RewriteTasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OriginalSources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContentItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContentItems {
    Table,
    Id,
    Title,
    Url,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OriginalSources {
    Table,
    Id,
    ContentId,
    Title,
    Html,
    Author,
    SourceUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RewriteTasks {
    Table,
    Id,
    ContentId,
    AiModel,
    PromptTemplate,
    Status,
    ErrorMessage,
    CreatedAt,
    StartedAt,
    CompletedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RewriteResults {
    Table,
    Id,
    TaskId,
    Version,
    Title,
    ContentHtml,
    ContentText,
    IsEdited,
    EditedContentHtml,
    CreatedAt,
    UpdatedAt,
}
