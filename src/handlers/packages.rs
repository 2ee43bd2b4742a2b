use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{invoice, package, package_feature};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a package
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreatePackageRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Base price before GST
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub price: Decimal,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    /// Feature list lines, stored in the given order
    #[serde(default)]
    pub features: Vec<String>,
}

/// Request body for updating a package. `features`, when present,
/// replaces the stored feature list.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdatePackageRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub features: Option<Vec<String>>,
}

/// Package response model with its feature list flattened in
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PackageResponse {
    pub id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub price: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    pub features: Vec<String>,
}

impl PackageResponse {
    fn from_parts(model: package::Model, features: Vec<String>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description,
            is_active: model.is_active,
            features,
        }
    }
}

async fn load_features(db: &DatabaseConnection, package_id: i32) -> Result<Vec<String>, DbErr> {
    Ok(package_feature::Entity::find()
        .filter(package_feature::Column::PackageId.eq(package_id))
        .order_by_asc(package_feature::Column::SortOrder)
        .all(db)
        .await?
        .into_iter()
        .map(|f| f.feature)
        .collect())
}

/// Create a new package
#[utoipa::path(
    post,
    path = "/api/v1/packages",
    tag = "packages",
    request_body = CreatePackageRequest,
    responses(
        (status = 201, description = "Package created successfully", body = ApiResponse<PackageResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Package name already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn create_package(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreatePackageRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PackageResponse>>), StatusCode> {
    trace!("Entering create_package function");
    debug!("Creating package: {}", request.name);

    if request.price.is_sign_negative() {
        warn!("Rejecting package create: negative price");
        return Err(StatusCode::BAD_REQUEST);
    }

    match package::Entity::find()
        .filter(package::Column::Name.eq(request.name.clone()))
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => {
            warn!("Package name '{}' already in use", request.name);
            return Err(StatusCode::CONFLICT);
        }
        Ok(None) => {}
        Err(db_error) => {
            error!("Failed to check package name uniqueness: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    let result: Result<package::Model, DbErr> = async {
        let txn = state.db.begin().await?;

        let inserted = package::ActiveModel {
            name: Set(request.name.clone()),
            price: Set(request.price),
            description: Set(request.description.clone()),
            is_active: Set(request.is_active.unwrap_or(true)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (i, feature) in request.features.iter().enumerate() {
            package_feature::ActiveModel {
                package_id: Set(inserted.id),
                feature: Set(feature.clone()),
                sort_order: Set(i as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(inserted)
    }
    .await;

    match result {
        Ok(inserted) => {
            info!("Package created successfully with ID: {}", inserted.id);
            let data = PackageResponse::from_parts(inserted, request.features);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data,
                    message: "Package created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to create package '{}': {}", request.name, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all packages
#[utoipa::path(
    get,
    path = "/api/v1/packages",
    tag = "packages",
    responses(
        (status = 200, description = "Packages retrieved successfully", body = ApiResponse<Vec<PackageResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_packages(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PackageResponse>>>, StatusCode> {
    trace!("Entering get_packages function");

    let packages = match package::Entity::find()
        .order_by_asc(package::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(packages) => packages,
        Err(db_error) => {
            error!("Failed to retrieve packages: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut data = Vec::with_capacity(packages.len());
    for model in packages {
        let features = match load_features(&state.db, model.id).await {
            Ok(features) => features,
            Err(db_error) => {
                error!(
                    "Failed to load features for package {}: {}",
                    model.id, db_error
                );
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };
        data.push(PackageResponse::from_parts(model, features));
    }

    info!("Successfully retrieved {} packages", data.len());
    Ok(Json(ApiResponse {
        data,
        message: "Packages retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific package by ID
#[utoipa::path(
    get,
    path = "/api/v1/packages/{package_id}",
    tag = "packages",
    params(
        ("package_id" = i32, Path, description = "Package ID"),
    ),
    responses(
        (status = 200, description = "Package retrieved successfully", body = ApiResponse<PackageResponse>),
        (status = 404, description = "Package not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_package(
    Path(package_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PackageResponse>>, StatusCode> {
    trace!("Entering get_package function for package_id: {}", package_id);

    let model = match package::Entity::find_by_id(package_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Package with ID {} not found", package_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to retrieve package {}: {}", package_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match load_features(&state.db, package_id).await {
        Ok(features) => Ok(Json(ApiResponse {
            data: PackageResponse::from_parts(model, features),
            message: "Package retrieved successfully".to_string(),
            success: true,
        })),
        Err(db_error) => {
            error!(
                "Failed to load features for package {}: {}",
                package_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a package
#[utoipa::path(
    put,
    path = "/api/v1/packages/{package_id}",
    tag = "packages",
    params(
        ("package_id" = i32, Path, description = "Package ID"),
    ),
    request_body = UpdatePackageRequest,
    responses(
        (status = 200, description = "Package updated successfully", body = ApiResponse<PackageResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Package not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn update_package(
    Path(package_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdatePackageRequest>>,
) -> Result<Json<ApiResponse<PackageResponse>>, StatusCode> {
    trace!("Entering update_package function for package_id: {}", package_id);

    if let Some(price) = request.price {
        if price.is_sign_negative() {
            warn!("Rejecting package update: negative price");
            return Err(StatusCode::BAD_REQUEST);
        }
    }

    let existing = match package::Entity::find_by_id(package_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Package with ID {} not found for update", package_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to look up package {}: {}", package_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: package::ActiveModel = existing.into();
    if let Some(name) = &request.name {
        active.name = Set(name.clone());
    }
    if let Some(price) = request.price {
        active.price = Set(price);
    }
    if let Some(description) = &request.description {
        active.description = Set(Some(description.clone()));
    }
    if let Some(is_active) = request.is_active {
        active.is_active = Set(is_active);
    }

    let result: Result<package::Model, DbErr> = async {
        let txn = state.db.begin().await?;

        let updated = active.update(&txn).await?;

        if let Some(features) = &request.features {
            package_feature::Entity::delete_many()
                .filter(package_feature::Column::PackageId.eq(package_id))
                .exec(&txn)
                .await?;
            for (i, feature) in features.iter().enumerate() {
                package_feature::ActiveModel {
                    package_id: Set(package_id),
                    feature: Set(feature.clone()),
                    sort_order: Set(i as i32),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(updated)
    }
    .await;

    match result {
        Ok(updated) => {
            info!("Package {} updated successfully", package_id);
            match load_features(&state.db, package_id).await {
                Ok(features) => Ok(Json(ApiResponse {
                    data: PackageResponse::from_parts(updated, features),
                    message: "Package updated successfully".to_string(),
                    success: true,
                })),
                Err(db_error) => {
                    error!(
                        "Failed to load features for package {}: {}",
                        package_id, db_error
                    );
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
        Err(db_error) => {
            error!("Failed to update package {}: {}", package_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a package. Refused while any invoice references it.
#[utoipa::path(
    delete,
    path = "/api/v1/packages/{package_id}",
    tag = "packages",
    params(
        ("package_id" = i32, Path, description = "Package ID"),
    ),
    responses(
        (status = 200, description = "Package deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Package not found", body = ErrorResponse),
        (status = 409, description = "Package referenced by invoices", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_package(
    Path(package_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_package function for package_id: {}", package_id);

    let invoice_count = match invoice::Entity::find()
        .filter(invoice::Column::PackageId.eq(package_id))
        .count(&state.db)
        .await
    {
        Ok(count) => count,
        Err(db_error) => {
            error!(
                "Failed to count invoices for package {}: {}",
                package_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    if invoice_count > 0 {
        warn!(
            "Refusing to delete package {}: {} invoices reference it",
            package_id, invoice_count
        );
        return Err(StatusCode::CONFLICT);
    }

    match package::Entity::delete_by_id(package_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Package {} deleted successfully", package_id);
                Ok(Json(ApiResponse {
                    data: format!("Package {} deleted", package_id),
                    message: "Package deleted successfully".to_string(),
                    success: true,
                }))
            } else {
                warn!("Package {} not found for deletion", package_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete package {}: {}", package_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Make sure the default catalog packages exist, creating any that are
/// missing. Already-present packages are left untouched.
#[utoipa::path(
    post,
    path = "/api/v1/packages/ensure-defaults",
    tag = "packages",
    responses(
        (status = 200, description = "Default packages ensured", body = ApiResponse<usize>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn ensure_defaults(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<usize>>, StatusCode> {
    trace!("Entering ensure_defaults function");

    match compute::ensure_default_packages(&state.db).await {
        Ok(created) => {
            info!("Default package check complete, {} created", created);
            Ok(Json(ApiResponse {
                data: created,
                message: "Default packages ensured".to_string(),
                success: true,
            }))
        }
        Err(compute_error) => {
            error!("Failed to ensure default packages: {}", compute_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
