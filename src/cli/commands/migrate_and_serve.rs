use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{debug, error, info, trace};

use crate::cli::commands::serve::serve;

pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");
    debug!("Database URL: {}", database_url);

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

    info!("Running database migrations");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    // Best-effort seed so a fresh deployment comes up usable; failures are
    // logged but never block startup.
    match compute::seed_database(&db).await {
        Ok(report) if !report.is_noop() => {
            info!(
                "Seeded database: admin_created={}, stages_created={}, packages_created={}",
                report.admin_created, report.stages_created, report.packages_created
            );
        }
        Ok(_) => {
            debug!("Database already seeded");
        }
        Err(e) => {
            error!("Database seeding failed (continuing anyway): {}", e);
        }
    }
    drop(db);

    serve(database_url, bind_address).await
}
