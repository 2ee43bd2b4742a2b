use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState};

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authenticate a user by email and password.
///
/// A user is authenticated only when the stored password matches exactly
/// (case-sensitive) and the account is active. Lookup misses, password
/// mismatches and inactive accounts all answer 401 without detail.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<UserResponse>),
        (status = 401, description = "Invalid credentials or inactive account", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, StatusCode> {
    trace!("Entering login function");
    debug!("Login attempt for email: {}", request.email);

    let user_model = match user::Entity::find()
        .filter(user::Column::Email.eq(request.email.clone()))
        .one(&state.db)
        .await
    {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            warn!("Login failed: no user with email {}", request.email);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(db_error) => {
            error!("Failed to look up user {}: {}", request.email, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if user_model.password != request.password {
        warn!("Login failed: password mismatch for {}", request.email);
        return Err(StatusCode::UNAUTHORIZED);
    }
    if !user_model.is_active {
        warn!("Login failed: account {} is inactive", request.email);
        return Err(StatusCode::UNAUTHORIZED);
    }

    info!("User {} logged in", user_model.email);
    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "Login successful".to_string(),
        success: true,
    };
    Ok(Json(response))
}
