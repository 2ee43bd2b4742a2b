use common::{
    AssignmentEntry, AssignmentOutcome, BoardLead, InvoiceTotals, PipelineBoard, SeedReport,
    StageColumn,
};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for derived read models
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Board(PipelineBoard),
}

/// Cache key of the pipeline board summary.
pub const BOARD_CACHE_KEY: &str = "pipeline_board";

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::login,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::sales_persons::create_sales_person,
        crate::handlers::sales_persons::get_sales_persons,
        crate::handlers::sales_persons::get_sales_person,
        crate::handlers::sales_persons::update_sales_person,
        crate::handlers::sales_persons::delete_sales_person,
        crate::handlers::leads::create_lead,
        crate::handlers::leads::get_leads,
        crate::handlers::leads::get_lead,
        crate::handlers::leads::update_lead,
        crate::handlers::leads::delete_lead,
        crate::handlers::leads::move_lead_status,
        crate::handlers::leads::set_lead_assignee,
        crate::handlers::leads::auto_assign::auto_assign_leads,
        crate::handlers::pipeline::get_stages,
        crate::handlers::pipeline::create_stage,
        crate::handlers::pipeline::update_stage,
        crate::handlers::pipeline::delete_stage,
        crate::handlers::pipeline::get_board,
        crate::handlers::packages::create_package,
        crate::handlers::packages::get_packages,
        crate::handlers::packages::get_package,
        crate::handlers::packages::update_package,
        crate::handlers::packages::delete_package,
        crate::handlers::packages::ensure_defaults,
        crate::handlers::invoices::create_invoice,
        crate::handlers::invoices::get_invoices,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::delete_invoice,
        crate::handlers::seed::seed_database,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            AssignmentEntry,
            AssignmentOutcome,
            BoardLead,
            StageColumn,
            PipelineBoard,
            InvoiceTotals,
            SeedReport,
            crate::handlers::auth::LoginRequest,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::sales_persons::CreateSalesPersonRequest,
            crate::handlers::sales_persons::UpdateSalesPersonRequest,
            crate::handlers::sales_persons::SalesPersonResponse,
            crate::handlers::leads::CreateLeadRequest,
            crate::handlers::leads::UpdateLeadRequest,
            crate::handlers::leads::MoveLeadStatusRequest,
            crate::handlers::leads::SetLeadAssigneeRequest,
            crate::handlers::leads::LeadResponse,
            crate::handlers::pipeline::CreateStageRequest,
            crate::handlers::pipeline::UpdateStageRequest,
            crate::handlers::pipeline::StageResponse,
            crate::handlers::packages::CreatePackageRequest,
            crate::handlers::packages::UpdatePackageRequest,
            crate::handlers::packages::PackageResponse,
            crate::handlers::invoices::CreateInvoiceRequest,
            crate::handlers::invoices::InvoiceResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "sales-persons", description = "Sales team onboarding endpoints"),
        (name = "leads", description = "Lead intake and pipeline endpoints"),
        (name = "pipeline", description = "Pipeline stage and board endpoints"),
        (name = "packages", description = "Service package catalog endpoints"),
        (name = "invoices", description = "Invoice endpoints"),
        (name = "seed", description = "Database seeding endpoints"),
    ),
    info(
        title = "Leadrust API",
        description = "Lead/Sales CRM API - sales team onboarding, lead pipeline tracking and invoicing",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
