use axum::{extract::State, http::StatusCode, response::Json};
use common::SeedReport;
use tracing::{error, info, instrument, trace};

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Seed the database with the default admin user, pipeline stages and
/// package catalog. Safe to call repeatedly; existing rows are kept.
#[utoipa::path(
    post,
    path = "/api/v1/seed",
    tag = "seed",
    responses(
        (status = 200, description = "Database seeded successfully", body = ApiResponse<SeedReport>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn seed_database(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SeedReport>>, StatusCode> {
    trace!("Entering seed_database function");

    match compute::seed_database(&state.db).await {
        Ok(report) => {
            if report.is_noop() {
                info!("Seed run made no changes");
            } else {
                info!(
                    "Seed run created admin: {}, {} stages, {} packages",
                    report.admin_created, report.stages_created, report.packages_created
                );
            }
            Ok(Json(ApiResponse {
                data: report,
                message: "Database seeded successfully".to_string(),
                success: true,
            }))
        }
        Err(compute_error) => {
            error!("Failed to seed database: {}", compute_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
