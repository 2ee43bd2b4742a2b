pub use sea_orm_migration::prelude::*;

mod m20250110_000001_create_tables;
mod m20250215_000001_add_lead_reminder;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_tables::Migration),
            Box::new(m20250215_000001_add_lead_reminder::Migration),
        ]
    }
}
