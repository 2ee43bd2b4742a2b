use anyhow::Result;
use moka::future::Cache;
use sea_orm::Database;
use std::time::Duration;

use crate::schemas::AppState;

/// Initialize application state for the given database URL.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Board summaries are cheap to rebuild, so a short TTL is enough to
    // absorb polling from multiple open boards.
    let cache = Cache::builder()
        .max_capacity(100)
        .time_to_live(Duration::from_secs(60))
        .build();

    Ok(AppState { db, cache })
}
