use axum::{extract::State, http::StatusCode, response::Json};
use common::AssignmentOutcome;
use compute::ComputeError;
use tracing::{error, info, instrument, trace, warn};

use crate::schemas::{ApiResponse, AppState, ErrorResponse, BOARD_CACHE_KEY};

/// Distribute all unassigned leads across active sales persons.
///
/// Leads go one at a time to whichever sales person currently holds the
/// fewest, so after the run the per-person counts differ by at most one.
#[utoipa::path(
    post,
    path = "/api/v1/leads/auto-assign",
    tag = "leads",
    responses(
        (status = 200, description = "Leads distributed successfully", body = ApiResponse<AssignmentOutcome>),
        (status = 409, description = "No active sales persons to assign to", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn auto_assign_leads(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AssignmentOutcome>>, StatusCode> {
    trace!("Entering auto_assign_leads function");

    match compute::assign_unassigned_leads(&state.db).await {
        Ok(outcome) => {
            info!(
                "Auto-assignment complete: {} of {} unassigned leads distributed across {} sales persons",
                outcome.assigned.len(),
                outcome.unassigned_before,
                outcome.sales_person_count
            );
            state.cache.invalidate(BOARD_CACHE_KEY).await;
            Ok(Json(ApiResponse {
                data: outcome,
                message: "Leads distributed successfully".to_string(),
                success: true,
            }))
        }
        Err(ComputeError::Assignment(reason)) => {
            warn!("Auto-assignment rejected: {}", reason);
            Err(StatusCode::CONFLICT)
        }
        Err(compute_error) => {
            error!("Auto-assignment failed: {}", compute_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
