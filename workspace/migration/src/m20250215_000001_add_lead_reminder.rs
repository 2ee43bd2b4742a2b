use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Add reminder_date column to leads table
        manager
            .alter_table(
                Table::alter()
                    .table(Alias::new("leads"))
                    .add_column(ColumnDef::new(Alias::new("reminder_date")).date())
                    .to_owned(),
            )
            .await?;

        // Add notes column to leads table
        manager
            .alter_table(
                Table::alter()
                    .table(Alias::new("leads"))
                    .add_column(ColumnDef::new(Alias::new("notes")).string())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Alias::new("leads"))
                    .drop_column(Alias::new("notes"))
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Alias::new("leads"))
                    .drop_column(Alias::new("reminder_date"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
