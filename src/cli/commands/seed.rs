use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{error, info, trace};

pub async fn seed(database_url: &str) -> Result<()> {
    trace!("Entering seed function");
    info!("Seeding database");

    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    // Make sure the schema exists before inserting anything.
    Migrator::up(&db, None).await?;

    let report = compute::seed_database(&db).await?;
    if report.is_noop() {
        info!("Database already seeded; nothing inserted");
    } else {
        info!(
            "Seed complete: admin_created={}, stages_created={}, packages_created={}",
            report.admin_created, report.stages_created, report.packages_created
        );
    }

    Ok(())
}
