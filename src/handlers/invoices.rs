use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::Utc;
use compute::ComputeError;
use model::entities::{invoice, package, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for raising an invoice. The package's current price is
/// used as the base; the GST amount and total are derived server-side.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "customer name must not be empty"))]
    pub customer_name: String,
    #[validate(email(message = "customer email must be a valid email address"))]
    pub customer_email: String,
    #[validate(custom(function = "crate::helpers::validation::validate_phone"))]
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub package_id: i32,
    /// GST rate in percent (e.g. "18")
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub gst_percentage: Decimal,
    pub notes: Option<String>,
    /// The user raising the invoice
    pub created_by: i32,
}

/// Invoice response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: i32,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub package_id: i32,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub gst_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub gst_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<invoice::Model> for InvoiceResponse {
    fn from(model: invoice::Model) -> Self {
        Self {
            id: model.id,
            invoice_number: model.invoice_number,
            customer_name: model.customer_name,
            customer_email: model.customer_email,
            customer_phone: model.customer_phone,
            customer_address: model.customer_address,
            package_id: model.package_id,
            base_price: model.base_price,
            gst_percentage: model.gst_percentage,
            gst_amount: model.gst_amount,
            total_amount: model.total_amount,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

/// Raise a new invoice against a package
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    tag = "invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created successfully", body = ApiResponse<InvoiceResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Package not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn create_invoice(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateInvoiceRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<InvoiceResponse>>), StatusCode> {
    trace!("Entering create_invoice function");
    debug!(
        "Creating invoice for customer '{}' against package {}",
        request.customer_name, request.package_id
    );

    let package_model = match package::Entity::find_by_id(request.package_id)
        .one(&state.db)
        .await
    {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!(
                "Rejecting invoice: package {} not found",
                request.package_id
            );
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!(
                "Failed to look up package {}: {}",
                request.package_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match user::Entity::find_by_id(request.created_by).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!(
                "Rejecting invoice: creating user {} not found",
                request.created_by
            );
            return Err(StatusCode::BAD_REQUEST);
        }
        Err(db_error) => {
            error!(
                "Failed to look up user {}: {}",
                request.created_by, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    let totals = match compute::derive_totals(package_model.price, request.gst_percentage) {
        Ok(totals) => totals,
        Err(ComputeError::Invoice(reason)) => {
            warn!("Rejecting invoice: {}", reason);
            return Err(StatusCode::BAD_REQUEST);
        }
        Err(compute_error) => {
            error!("Failed to derive invoice totals: {}", compute_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let now = Utc::now();

    // Two same-day creates can race to the same number; the loser hits the
    // unique constraint on invoice_number and re-derives from the winner's
    // committed row.
    let mut inserted = None;
    for attempt in 0..3 {
        let invoice_number = match compute::next_invoice_number(&state.db, now.date_naive()).await
        {
            Ok(number) => number,
            Err(compute_error) => {
                error!("Failed to derive invoice number: {}", compute_error);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        let new_invoice = invoice::ActiveModel {
            invoice_number: Set(invoice_number.clone()),
            customer_name: Set(request.customer_name.clone()),
            customer_email: Set(request.customer_email.clone()),
            customer_phone: Set(request.customer_phone.clone()),
            customer_address: Set(request.customer_address.clone()),
            package_id: Set(request.package_id),
            base_price: Set(totals.base_price),
            gst_percentage: Set(totals.gst_percentage),
            gst_amount: Set(totals.gst_amount),
            total_amount: Set(totals.total_amount),
            notes: Set(request.notes.clone()),
            created_by: Set(request.created_by),
            created_at: Set(now),
            ..Default::default()
        };

        match new_invoice.insert(&state.db).await {
            Ok(model) => {
                inserted = Some(model);
                break;
            }
            Err(db_error) => {
                if matches!(db_error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    warn!(
                        "Invoice number {} taken, re-deriving (attempt {})",
                        invoice_number,
                        attempt + 1
                    );
                    continue;
                }
                error!("Failed to create invoice: {}", db_error);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    match inserted {
        Some(inserted) => {
            info!(
                "Invoice {} created successfully with ID: {}",
                inserted.invoice_number, inserted.id
            );
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: InvoiceResponse::from(inserted),
                    message: "Invoice created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        None => {
            error!("Gave up creating invoice after repeated number collisions");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all invoices, newest first
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    tag = "invoices",
    responses(
        (status = 200, description = "Invoices retrieved successfully", body = ApiResponse<Vec<InvoiceResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_invoices(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<InvoiceResponse>>>, StatusCode> {
    trace!("Entering get_invoices function");

    match invoice::Entity::find()
        .order_by_desc(invoice::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(invoices) => {
            info!("Successfully retrieved {} invoices", invoices.len());
            Ok(Json(ApiResponse {
                data: invoices.into_iter().map(InvoiceResponse::from).collect(),
                message: "Invoices retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve invoices: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific invoice by ID
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{invoice_id}",
    tag = "invoices",
    params(
        ("invoice_id" = i32, Path, description = "Invoice ID"),
    ),
    responses(
        (status = 200, description = "Invoice retrieved successfully", body = ApiResponse<InvoiceResponse>),
        (status = 404, description = "Invoice not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_invoice(
    Path(invoice_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, StatusCode> {
    trace!("Entering get_invoice function for invoice_id: {}", invoice_id);

    match invoice::Entity::find_by_id(invoice_id).one(&state.db).await {
        Ok(Some(model)) => Ok(Json(ApiResponse {
            data: InvoiceResponse::from(model),
            message: "Invoice retrieved successfully".to_string(),
            success: true,
        })),
        Ok(None) => {
            warn!("Invoice with ID {} not found", invoice_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve invoice {}: {}", invoice_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete an invoice
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{invoice_id}",
    tag = "invoices",
    params(
        ("invoice_id" = i32, Path, description = "Invoice ID"),
    ),
    responses(
        (status = 200, description = "Invoice deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Invoice not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_invoice(
    Path(invoice_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_invoice function for invoice_id: {}", invoice_id);

    match invoice::Entity::delete_by_id(invoice_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Invoice {} deleted successfully", invoice_id);
                Ok(Json(ApiResponse {
                    data: format!("Invoice {} deleted", invoice_id),
                    message: "Invoice deleted successfully".to_string(),
                    success: true,
                }))
            } else {
                warn!("Invoice {} not found for deletion", invoice_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete invoice {}: {}", invoice_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
