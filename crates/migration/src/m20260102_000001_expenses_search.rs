use sea_orm_migration::prelude::*;

use crate::m20260101_000001_expenses::Expenses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite takes one column per ALTER TABLE.
        for column in [Expenses::TitleFolded, Expenses::DescriptionFolded] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Expenses::Table)
                        .add_column(ColumnDef::new(column).string().not_null().default(""))
                        .to_owned(),
                )
                .await?;
        }

        // Rows written from now on get Unicode folding from the engine; older
        // rows only get SQLite's ASCII folding until they are next updated.
        manager
            .get_connection()
            .execute_unprepared(
                "UPDATE expenses SET title_folded = LOWER(title), \
                 description_folded = LOWER(description)",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [Expenses::DescriptionFolded, Expenses::TitleFolded] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Expenses::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
