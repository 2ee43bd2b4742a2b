use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{sales_person, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for onboarding a sales person.
///
/// Onboarding creates a sales-role login user and the linked sales person
/// profile in one transaction.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateSalesPersonRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Login email for the new user (must be unique)
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "crate::helpers::validation::validate_phone"))]
    pub phone: String,
    /// Initial login password
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Request body for updating a sales person
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateSalesPersonRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "crate::helpers::validation::validate_phone"))]
    pub phone: Option<String>,
    /// Status: "active" or "inactive"
    pub status: Option<String>,
}

/// Sales person response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalesPersonResponse {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
}

impl From<sales_person::Model> for SalesPersonResponse {
    fn from(model: sales_person::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            status: model.status.as_str().to_string(),
        }
    }
}

/// Onboard a new sales person
#[utoipa::path(
    post,
    path = "/api/v1/sales-persons",
    tag = "sales-persons",
    request_body = CreateSalesPersonRequest,
    responses(
        (status = 201, description = "Sales person onboarded successfully", body = ApiResponse<SalesPersonResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn create_sales_person(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateSalesPersonRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<SalesPersonResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering create_sales_person function");
    debug!("Onboarding sales person: {} <{}>", request.name, request.email);

    let duplicate = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.clone()))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up email {}: {}", request.email, db_error);
            internal_error()
        })?;
    if duplicate.is_some() {
        warn!(
            "Rejecting sales person onboarding: email {} already in use",
            request.email
        );
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("email already in use: {}", request.email),
                code: "DUPLICATE_EMAIL".to_string(),
                success: false,
            }),
        ));
    }

    // The login user and the profile land together or not at all.
    let txn = state.db.begin().await.map_err(|db_error| {
        error!("Failed to open transaction: {}", db_error);
        internal_error()
    })?;

    let result: Result<sales_person::Model, sea_orm::DbErr> = async {
        let login = user::ActiveModel {
            email: Set(request.email.clone()),
            password: Set(request.password.clone()),
            role: Set(user::UserRole::Sales),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let profile = sales_person::ActiveModel {
            user_id: Set(login.id),
            name: Set(request.name.clone()),
            email: Set(request.email.clone()),
            phone: Set(request.phone.clone()),
            status: Set(sales_person::SalesPersonStatus::Active),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(profile)
    }
    .await;

    match result {
        Ok(profile) => {
            info!(
                "Sales person onboarded with ID: {}, user ID: {}",
                profile.id, profile.user_id
            );
            let response = ApiResponse {
                data: SalesPersonResponse::from(profile),
                message: "Sales person onboarded successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to onboard sales person '{}': {}",
                request.name, db_error
            );
            Err(internal_error())
        }
    }
}

fn internal_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "database error".to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

/// Get all sales persons
#[utoipa::path(
    get,
    path = "/api/v1/sales-persons",
    tag = "sales-persons",
    responses(
        (status = 200, description = "Sales persons retrieved successfully", body = ApiResponse<Vec<SalesPersonResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_sales_persons(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SalesPersonResponse>>>, StatusCode> {
    trace!("Entering get_sales_persons function");

    match sales_person::Entity::find().all(&state.db).await {
        Ok(rows) => {
            let count = rows.len();
            let data: Vec<SalesPersonResponse> =
                rows.into_iter().map(SalesPersonResponse::from).collect();

            info!("Successfully retrieved {} sales persons", count);
            Ok(Json(ApiResponse {
                data,
                message: "Sales persons retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve sales persons: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific sales person by ID
#[utoipa::path(
    get,
    path = "/api/v1/sales-persons/{sales_person_id}",
    tag = "sales-persons",
    params(
        ("sales_person_id" = i32, Path, description = "Sales person ID"),
    ),
    responses(
        (status = 200, description = "Sales person retrieved successfully", body = ApiResponse<SalesPersonResponse>),
        (status = 404, description = "Sales person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_sales_person(
    Path(sales_person_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SalesPersonResponse>>, StatusCode> {
    trace!(
        "Entering get_sales_person function for ID: {}",
        sales_person_id
    );

    match sales_person::Entity::find_by_id(sales_person_id)
        .one(&state.db)
        .await
    {
        Ok(Some(model)) => {
            info!("Successfully retrieved sales person {}", model.id);
            Ok(Json(ApiResponse {
                data: SalesPersonResponse::from(model),
                message: "Sales person retrieved successfully".to_string(),
                success: true,
            }))
        }
        Ok(None) => {
            warn!("Sales person with ID {} not found", sales_person_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve sales person {}: {}",
                sales_person_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a sales person
#[utoipa::path(
    put,
    path = "/api/v1/sales-persons/{sales_person_id}",
    tag = "sales-persons",
    params(
        ("sales_person_id" = i32, Path, description = "Sales person ID"),
    ),
    request_body = UpdateSalesPersonRequest,
    responses(
        (status = 200, description = "Sales person updated successfully", body = ApiResponse<SalesPersonResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Sales person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn update_sales_person(
    Path(sales_person_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateSalesPersonRequest>>,
) -> Result<Json<ApiResponse<SalesPersonResponse>>, StatusCode> {
    trace!(
        "Entering update_sales_person function for ID: {}",
        sales_person_id
    );

    let existing = match sales_person::Entity::find_by_id(sales_person_id)
        .one(&state.db)
        .await
    {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Sales person with ID {} not found for update", sales_person_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!(
                "Failed to look up sales person {}: {}",
                sales_person_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: sales_person::ActiveModel = existing.into();

    if let Some(name) = request.name {
        debug!("Updating sales person name to: {}", name);
        active.name = Set(name);
    }
    if let Some(email) = request.email {
        debug!("Updating sales person email to: {}", email);
        active.email = Set(email);
    }
    if let Some(phone) = request.phone {
        debug!("Updating sales person phone");
        active.phone = Set(phone);
    }
    if let Some(status) = request.status {
        let status = sales_person::SalesPersonStatus::from_str(&status).map_err(|e| {
            warn!("Rejecting sales person update: {}", e);
            StatusCode::BAD_REQUEST
        })?;
        active.status = Set(status);
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Sales person {} updated successfully", sales_person_id);
            Ok(Json(ApiResponse {
                data: SalesPersonResponse::from(updated),
                message: "Sales person updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!(
                "Failed to update sales person {}: {}",
                sales_person_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a sales person
///
/// Leads assigned to the deleted sales person drop back to unassigned.
#[utoipa::path(
    delete,
    path = "/api/v1/sales-persons/{sales_person_id}",
    tag = "sales-persons",
    params(
        ("sales_person_id" = i32, Path, description = "Sales person ID"),
    ),
    responses(
        (status = 200, description = "Sales person deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Sales person not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_sales_person(
    Path(sales_person_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!(
        "Entering delete_sales_person function for ID: {}",
        sales_person_id
    );

    match sales_person::Entity::delete_by_id(sales_person_id)
        .exec(&state.db)
        .await
    {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Sales person {} deleted successfully", sales_person_id);
                Ok(Json(ApiResponse {
                    data: format!("Sales person {} deleted", sales_person_id),
                    message: "Sales person deleted successfully".to_string(),
                    success: true,
                }))
            } else {
                warn!("Sales person {} not found for deletion", sales_person_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!(
                "Failed to delete sales person {}: {}",
                sales_person_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
