use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info, trace};

use crate::config::initialize_app_state_with_url;
use crate::router::create_router;

pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering serve function");
    info!("Starting CRM backend");
    debug!("Database URL: {}", database_url);

    let state = initialize_app_state_with_url(database_url)
        .await
        .context("failed to initialize application state")?;

    let app = create_router(state);

    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind to {bind_address}"))?;
    info!("Listening on {}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}
