use crate::handlers::{
    auth::login,
    health::health_check,
    invoices::{create_invoice, delete_invoice, get_invoice, get_invoices},
    leads::{
        auto_assign::auto_assign_leads, create_lead, delete_lead, get_lead, get_leads,
        move_lead_status, set_lead_assignee, update_lead,
    },
    packages::{
        create_package, delete_package, ensure_defaults, get_package, get_packages,
        update_package,
    },
    pipeline::{create_stage, delete_stage, get_board, get_stages, update_stage},
    sales_persons::{
        create_sales_person, delete_sales_person, get_sales_person, get_sales_persons,
        update_sales_person,
    },
    seed::seed_database,
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth
        .route("/api/v1/auth/login", post(login))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Sales person CRUD routes
        .route("/api/v1/sales-persons", post(create_sales_person))
        .route("/api/v1/sales-persons", get(get_sales_persons))
        .route("/api/v1/sales-persons/:sales_person_id", get(get_sales_person))
        .route("/api/v1/sales-persons/:sales_person_id", put(update_sales_person))
        .route("/api/v1/sales-persons/:sales_person_id", delete(delete_sales_person))
        // Lead CRUD and pipeline movement routes
        .route("/api/v1/leads", post(create_lead))
        .route("/api/v1/leads", get(get_leads))
        .route("/api/v1/leads/auto-assign", post(auto_assign_leads))
        .route("/api/v1/leads/:lead_id", get(get_lead))
        .route("/api/v1/leads/:lead_id", put(update_lead))
        .route("/api/v1/leads/:lead_id", delete(delete_lead))
        .route("/api/v1/leads/:lead_id/status", put(move_lead_status))
        .route("/api/v1/leads/:lead_id/assignee", put(set_lead_assignee))
        // Pipeline stage and board routes
        .route("/api/v1/pipeline/stages", post(create_stage))
        .route("/api/v1/pipeline/stages", get(get_stages))
        .route("/api/v1/pipeline/stages/:stage_id", put(update_stage))
        .route("/api/v1/pipeline/stages/:stage_id", delete(delete_stage))
        .route("/api/v1/pipeline/board", get(get_board))
        // Package catalog routes
        .route("/api/v1/packages", post(create_package))
        .route("/api/v1/packages", get(get_packages))
        .route("/api/v1/packages/ensure-defaults", post(ensure_defaults))
        .route("/api/v1/packages/:package_id", get(get_package))
        .route("/api/v1/packages/:package_id", put(update_package))
        .route("/api/v1/packages/:package_id", delete(delete_package))
        // Invoice routes
        .route("/api/v1/invoices", post(create_invoice))
        .route("/api/v1/invoices", get(get_invoices))
        .route("/api/v1/invoices/:invoice_id", get(get_invoice))
        .route("/api/v1/invoices/:invoice_id", delete(delete_invoice))
        // Seed route
        .route("/api/v1/seed", post(seed_database))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
