use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::{lead, lead_email, lead_phone, lead_status, sales_person};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse, BOARD_CACHE_KEY};

pub mod auto_assign;

/// Request body for creating a new lead
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub company: Option<String>,
    /// Pipeline stage; defaults to the first stage when omitted
    pub status_id: Option<i32>,
    /// Sales person to assign the lead to
    pub assigned_to: Option<i32>,
    /// Follow-up reminder date (YYYY-MM-DD)
    pub reminder_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Contact email addresses; the first becomes primary
    #[validate(custom(function = "crate::helpers::validation::validate_email_list"))]
    #[serde(default)]
    pub emails: Vec<String>,
    /// Contact phone numbers; the first becomes primary
    #[validate(custom(function = "crate::helpers::validation::validate_phone_list"))]
    #[serde(default)]
    pub phones: Vec<String>,
}

/// Request body for updating a lead. Omitted fields stay untouched;
/// `emails`/`phones`, when present, replace the stored contact rows.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLeadRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub company: Option<String>,
    pub status_id: Option<i32>,
    pub reminder_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[validate(custom(function = "crate::helpers::validation::validate_email_list"))]
    pub emails: Option<Vec<String>>,
    #[validate(custom(function = "crate::helpers::validation::validate_phone_list"))]
    pub phones: Option<Vec<String>>,
}

/// Request body for moving a lead to another pipeline stage
/// (the API behind the board's drag-and-drop).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MoveLeadStatusRequest {
    pub status_id: i32,
}

/// Request body for assigning a lead. `null` clears the assignment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetLeadAssigneeRequest {
    pub sales_person_id: Option<i32>,
}

/// Query parameters for listing leads
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeadListQuery {
    /// Only leads in this pipeline stage
    pub status_id: Option<i32>,
    /// Only leads assigned to this sales person
    pub assigned_to: Option<i32>,
    /// Only leads with no assignee
    pub unassigned: Option<bool>,
}

/// Lead response model, contact rows flattened in
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeadResponse {
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    pub status_id: i32,
    pub assigned_to: Option<i32>,
    pub reminder_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl LeadResponse {
    fn from_parts(model: lead::Model, emails: Vec<String>, phones: Vec<String>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            company: model.company,
            status_id: model.status_id,
            assigned_to: model.assigned_to,
            reminder_date: model.reminder_date,
            notes: model.notes,
            emails,
            phones,
        }
    }
}

/// Load contact rows for a set of leads, grouped by lead id.
async fn load_contacts(
    db: &DatabaseConnection,
    lead_ids: &[i32],
) -> Result<(HashMap<i32, Vec<String>>, HashMap<i32, Vec<String>>), DbErr> {
    let mut emails: HashMap<i32, Vec<String>> = HashMap::new();
    for row in lead_email::Entity::find()
        .filter(lead_email::Column::LeadId.is_in(lead_ids.to_vec()))
        .order_by_asc(lead_email::Column::Id)
        .all(db)
        .await?
    {
        emails.entry(row.lead_id).or_default().push(row.email);
    }

    let mut phones: HashMap<i32, Vec<String>> = HashMap::new();
    for row in lead_phone::Entity::find()
        .filter(lead_phone::Column::LeadId.is_in(lead_ids.to_vec()))
        .order_by_asc(lead_phone::Column::Id)
        .all(db)
        .await?
    {
        phones.entry(row.lead_id).or_default().push(row.phone);
    }

    Ok((emails, phones))
}

async fn build_lead_response(
    db: &DatabaseConnection,
    model: lead::Model,
) -> Result<LeadResponse, DbErr> {
    let (mut emails, mut phones) = load_contacts(db, &[model.id]).await?;
    let id = model.id;
    Ok(LeadResponse::from_parts(
        model,
        emails.remove(&id).unwrap_or_default(),
        phones.remove(&id).unwrap_or_default(),
    ))
}

/// Create a new lead
#[utoipa::path(
    post,
    path = "/api/v1/leads",
    tag = "leads",
    request_body = CreateLeadRequest,
    responses(
        (status = 201, description = "Lead created successfully", body = ApiResponse<LeadResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Pipeline has no stages yet", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn create_lead(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateLeadRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LeadResponse>>), StatusCode> {
    trace!("Entering create_lead function");
    debug!("Creating lead with name: {}", request.name);

    // Resolve the pipeline stage: explicit id must exist, otherwise the
    // lead enters at the first stage of the board.
    let status_id = match request.status_id {
        Some(id) => {
            match lead_status::Entity::find_by_id(id).one(&state.db).await {
                Ok(Some(stage)) => stage.id,
                Ok(None) => {
                    warn!("Rejecting lead create: unknown stage {}", id);
                    return Err(StatusCode::BAD_REQUEST);
                }
                Err(db_error) => {
                    error!("Failed to look up stage {}: {}", id, db_error);
                    return Err(StatusCode::INTERNAL_SERVER_ERROR);
                }
            }
        }
        None => {
            match lead_status::Entity::find()
                .order_by_asc(lead_status::Column::SortOrder)
                .one(&state.db)
                .await
            {
                Ok(Some(stage)) => stage.id,
                Ok(None) => {
                    warn!("Rejecting lead create: pipeline has no stages");
                    return Err(StatusCode::CONFLICT);
                }
                Err(db_error) => {
                    error!("Failed to look up first stage: {}", db_error);
                    return Err(StatusCode::INTERNAL_SERVER_ERROR);
                }
            }
        }
    };

    if let Some(sp_id) = request.assigned_to {
        match sales_person::Entity::find_by_id(sp_id).one(&state.db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("Rejecting lead create: unknown sales person {}", sp_id);
                return Err(StatusCode::BAD_REQUEST);
            }
            Err(db_error) => {
                error!("Failed to look up sales person {}: {}", sp_id, db_error);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    // The lead row and its contact rows land together or not at all.
    let result: Result<lead::Model, DbErr> = async {
        let txn = state.db.begin().await?;

        let inserted = lead::ActiveModel {
            name: Set(request.name.clone()),
            company: Set(request.company.clone()),
            status_id: Set(status_id),
            assigned_to: Set(request.assigned_to),
            reminder_date: Set(request.reminder_date),
            notes: Set(request.notes.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (i, email) in request.emails.iter().enumerate() {
            lead_email::ActiveModel {
                lead_id: Set(inserted.id),
                email: Set(email.clone()),
                is_primary: Set(i == 0),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        for (i, phone) in request.phones.iter().enumerate() {
            lead_phone::ActiveModel {
                lead_id: Set(inserted.id),
                phone: Set(phone.clone()),
                is_primary: Set(i == 0),
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
            info!("Lead created successfully with ID: {}", inserted.id);
            state.cache.invalidate(BOARD_CACHE_KEY).await;
            let data = LeadResponse::from_parts(inserted, request.emails, request.phones);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data,
                    message: "Lead created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to create lead '{}': {}", request.name, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all leads, optionally filtered by stage or assignee
#[utoipa::path(
    get,
    path = "/api/v1/leads",
    tag = "leads",
    responses(
        (status = 200, description = "Leads retrieved successfully", body = ApiResponse<Vec<LeadResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_leads(
    Query(query): Query<LeadListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LeadResponse>>>, StatusCode> {
    trace!("Entering get_leads function");

    let mut finder = lead::Entity::find().order_by_asc(lead::Column::Id);
    if let Some(status_id) = query.status_id {
        finder = finder.filter(lead::Column::StatusId.eq(status_id));
    }
    if let Some(assigned_to) = query.assigned_to {
        finder = finder.filter(lead::Column::AssignedTo.eq(assigned_to));
    }
    if query.unassigned.unwrap_or(false) {
        finder = finder.filter(lead::Column::AssignedTo.is_null());
    }

    let leads = match finder.all(&state.db).await {
        Ok(leads) => leads,
        Err(db_error) => {
            error!("Failed to retrieve leads: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let ids: Vec<i32> = leads.iter().map(|l| l.id).collect();
    let (mut emails, mut phones) = match load_contacts(&state.db, &ids).await {
        Ok(contacts) => contacts,
        Err(db_error) => {
            error!("Failed to load lead contacts: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let count = leads.len();
    let data: Vec<LeadResponse> = leads
        .into_iter()
        .map(|l| {
            let id = l.id;
            LeadResponse::from_parts(
                l,
                emails.remove(&id).unwrap_or_default(),
                phones.remove(&id).unwrap_or_default(),
            )
        })
        .collect();

    info!("Successfully retrieved {} leads", count);
    Ok(Json(ApiResponse {
        data,
        message: "Leads retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific lead by ID
#[utoipa::path(
    get,
    path = "/api/v1/leads/{lead_id}",
    tag = "leads",
    params(
        ("lead_id" = i32, Path, description = "Lead ID"),
    ),
    responses(
        (status = 200, description = "Lead retrieved successfully", body = ApiResponse<LeadResponse>),
        (status = 404, description = "Lead not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_lead(
    Path(lead_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeadResponse>>, StatusCode> {
    trace!("Entering get_lead function for lead_id: {}", lead_id);

    let model = match lead::Entity::find_by_id(lead_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Lead with ID {} not found", lead_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to retrieve lead {}: {}", lead_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match build_lead_response(&state.db, model).await {
        Ok(data) => Ok(Json(ApiResponse {
            data,
            message: "Lead retrieved successfully".to_string(),
            success: true,
        })),
        Err(db_error) => {
            error!("Failed to load contacts for lead {}: {}", lead_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a lead
#[utoipa::path(
    put,
    path = "/api/v1/leads/{lead_id}",
    tag = "leads",
    params(
        ("lead_id" = i32, Path, description = "Lead ID"),
    ),
    request_body = UpdateLeadRequest,
    responses(
        (status = 200, description = "Lead updated successfully", body = ApiResponse<LeadResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Lead not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn update_lead(
    Path(lead_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateLeadRequest>>,
) -> Result<Json<ApiResponse<LeadResponse>>, StatusCode> {
    trace!("Entering update_lead function for lead_id: {}", lead_id);

    let existing = match lead::Entity::find_by_id(lead_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Lead with ID {} not found for update", lead_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to look up lead {}: {}", lead_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if let Some(status_id) = request.status_id {
        match lead_status::Entity::find_by_id(status_id).one(&state.db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("Rejecting lead update: unknown stage {}", status_id);
                return Err(StatusCode::BAD_REQUEST);
            }
            Err(db_error) => {
                error!("Failed to look up stage {}: {}", status_id, db_error);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    let mut active: lead::ActiveModel = existing.into();
    if let Some(name) = &request.name {
        active.name = Set(name.clone());
    }
    if let Some(company) = &request.company {
        active.company = Set(Some(company.clone()));
    }
    if let Some(status_id) = request.status_id {
        active.status_id = Set(status_id);
    }
    if let Some(reminder_date) = request.reminder_date {
        active.reminder_date = Set(Some(reminder_date));
    }
    if let Some(notes) = &request.notes {
        active.notes = Set(Some(notes.clone()));
    }

    let result: Result<lead::Model, DbErr> = async {
        let txn = state.db.begin().await?;

        let updated = active.update(&txn).await?;

        // Contact lists replace wholesale when supplied.
        if let Some(emails) = &request.emails {
            lead_email::Entity::delete_many()
                .filter(lead_email::Column::LeadId.eq(lead_id))
                .exec(&txn)
                .await?;
            for (i, email) in emails.iter().enumerate() {
                lead_email::ActiveModel {
                    lead_id: Set(lead_id),
                    email: Set(email.clone()),
                    is_primary: Set(i == 0),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }
        if let Some(phones) = &request.phones {
            lead_phone::Entity::delete_many()
                .filter(lead_phone::Column::LeadId.eq(lead_id))
                .exec(&txn)
                .await?;
            for (i, phone) in phones.iter().enumerate() {
                lead_phone::ActiveModel {
                    lead_id: Set(lead_id),
                    phone: Set(phone.clone()),
                    is_primary: Set(i == 0),
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
            info!("Lead {} updated successfully", lead_id);
            state.cache.invalidate(BOARD_CACHE_KEY).await;
            match build_lead_response(&state.db, updated).await {
                Ok(data) => Ok(Json(ApiResponse {
                    data,
                    message: "Lead updated successfully".to_string(),
                    success: true,
                })),
                Err(db_error) => {
                    error!("Failed to load contacts for lead {}: {}", lead_id, db_error);
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
        Err(db_error) => {
            error!("Failed to update lead {}: {}", lead_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Move a lead to another pipeline stage
#[utoipa::path(
    put,
    path = "/api/v1/leads/{lead_id}/status",
    tag = "leads",
    params(
        ("lead_id" = i32, Path, description = "Lead ID"),
    ),
    request_body = MoveLeadStatusRequest,
    responses(
        (status = 200, description = "Lead moved successfully", body = ApiResponse<LeadResponse>),
        (status = 400, description = "Unknown pipeline stage", body = ErrorResponse),
        (status = 404, description = "Lead not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn move_lead_status(
    Path(lead_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<MoveLeadStatusRequest>,
) -> Result<Json<ApiResponse<LeadResponse>>, StatusCode> {
    trace!(
        "Entering move_lead_status for lead_id: {}, status_id: {}",
        lead_id,
        request.status_id
    );

    match lead_status::Entity::find_by_id(request.status_id)
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Rejecting lead move: unknown stage {}", request.status_id);
            return Err(StatusCode::BAD_REQUEST);
        }
        Err(db_error) => {
            error!(
                "Failed to look up stage {}: {}",
                request.status_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    let existing = match lead::Entity::find_by_id(lead_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Lead with ID {} not found for move", lead_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to look up lead {}: {}", lead_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: lead::ActiveModel = existing.into();
    active.status_id = Set(request.status_id);

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Lead {} moved to stage {}", lead_id, request.status_id);
            state.cache.invalidate(BOARD_CACHE_KEY).await;
            match build_lead_response(&state.db, updated).await {
                Ok(data) => Ok(Json(ApiResponse {
                    data,
                    message: "Lead moved successfully".to_string(),
                    success: true,
                })),
                Err(db_error) => {
                    error!("Failed to load contacts for lead {}: {}", lead_id, db_error);
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
        Err(db_error) => {
            error!("Failed to move lead {}: {}", lead_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Assign or unassign a lead
#[utoipa::path(
    put,
    path = "/api/v1/leads/{lead_id}/assignee",
    tag = "leads",
    params(
        ("lead_id" = i32, Path, description = "Lead ID"),
    ),
    request_body = SetLeadAssigneeRequest,
    responses(
        (status = 200, description = "Lead assignee updated successfully", body = ApiResponse<LeadResponse>),
        (status = 400, description = "Unknown sales person", body = ErrorResponse),
        (status = 404, description = "Lead not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn set_lead_assignee(
    Path(lead_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<SetLeadAssigneeRequest>,
) -> Result<Json<ApiResponse<LeadResponse>>, StatusCode> {
    trace!("Entering set_lead_assignee for lead_id: {}", lead_id);

    if let Some(sp_id) = request.sales_person_id {
        match sales_person::Entity::find_by_id(sp_id).one(&state.db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("Rejecting assignment: unknown sales person {}", sp_id);
                return Err(StatusCode::BAD_REQUEST);
            }
            Err(db_error) => {
                error!("Failed to look up sales person {}: {}", sp_id, db_error);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    let existing = match lead::Entity::find_by_id(lead_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Lead with ID {} not found for assignment", lead_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to look up lead {}: {}", lead_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: lead::ActiveModel = existing.into();
    active.assigned_to = Set(request.sales_person_id);

    match active.update(&state.db).await {
        Ok(updated) => {
            info!(
                "Lead {} assignee set to {:?}",
                lead_id, request.sales_person_id
            );
            state.cache.invalidate(BOARD_CACHE_KEY).await;
            match build_lead_response(&state.db, updated).await {
                Ok(data) => Ok(Json(ApiResponse {
                    data,
                    message: "Lead assignee updated successfully".to_string(),
                    success: true,
                })),
                Err(db_error) => {
                    error!("Failed to load contacts for lead {}: {}", lead_id, db_error);
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
        Err(db_error) => {
            error!("Failed to set assignee for lead {}: {}", lead_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a lead
#[utoipa::path(
    delete,
    path = "/api/v1/leads/{lead_id}",
    tag = "leads",
    params(
        ("lead_id" = i32, Path, description = "Lead ID"),
    ),
    responses(
        (status = 200, description = "Lead deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Lead not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_lead(
    Path(lead_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_lead function for lead_id: {}", lead_id);

    match lead::Entity::delete_by_id(lead_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Lead {} deleted successfully", lead_id);
                state.cache.invalidate(BOARD_CACHE_KEY).await;
                Ok(Json(ApiResponse {
                    data: format!("Lead {} deleted", lead_id),
                    message: "Lead deleted successfully".to_string(),
                    success: true,
                }))
            } else {
                warn!("Lead {} not found for deletion", lead_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete lead {}: {}", lead_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
