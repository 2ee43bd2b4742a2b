use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{info, trace};

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database at {}", database_url);

    ensure_sqlite_parent_dir(database_url)?;

    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("failed to connect to {database_url}"))?;

    let pending = Migrator::get_pending_migrations(&db)
        .await
        .context("failed to inspect migration state")?
        .len();
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    info!("Database initialized, {} migrations applied", pending);
    Ok(())
}

/// For `sqlite://path/to/file.db` URLs, create the parent directory so
/// the connect call doesn't fail on a fresh checkout.
fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    if path.starts_with(':') {
        // ":memory:" and friends
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
