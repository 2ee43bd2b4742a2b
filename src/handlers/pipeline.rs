use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::PipelineBoard;
use model::entities::{lead, lead_status};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, BOARD_CACHE_KEY};

/// Request body for creating a pipeline stage
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateStageRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Position of the stage on the board, ascending
    pub sort_order: i32,
    /// Display color as a hex string (e.g. "#3B82F6")
    pub color: String,
}

/// Request body for updating a pipeline stage
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateStageRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub sort_order: Option<i32>,
    pub color: Option<String>,
}

/// Pipeline stage response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StageResponse {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
    pub color: String,
}

impl From<lead_status::Model> for StageResponse {
    fn from(model: lead_status::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sort_order: model.sort_order,
            color: model.color,
        }
    }
}

/// Create a new pipeline stage
#[utoipa::path(
    post,
    path = "/api/v1/pipeline/stages",
    tag = "pipeline",
    request_body = CreateStageRequest,
    responses(
        (status = 201, description = "Stage created successfully", body = ApiResponse<StageResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Stage name already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn create_stage(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateStageRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<StageResponse>>), StatusCode> {
    trace!("Entering create_stage function");
    debug!("Creating pipeline stage: {}", request.name);

    match lead_status::Entity::find()
        .filter(lead_status::Column::Name.eq(request.name.clone()))
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => {
            warn!("Stage name '{}' already in use", request.name);
            return Err(StatusCode::CONFLICT);
        }
        Ok(None) => {}
        Err(db_error) => {
            error!("Failed to check stage name uniqueness: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    let new_stage = lead_status::ActiveModel {
        name: Set(request.name.clone()),
        sort_order: Set(request.sort_order),
        color: Set(request.color.clone()),
        ..Default::default()
    };

    match new_stage.insert(&state.db).await {
        Ok(inserted) => {
            info!("Stage created successfully with ID: {}", inserted.id);
            state.cache.invalidate(BOARD_CACHE_KEY).await;
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: StageResponse::from(inserted),
                    message: "Stage created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to create stage '{}': {}", request.name, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all pipeline stages in board order
#[utoipa::path(
    get,
    path = "/api/v1/pipeline/stages",
    tag = "pipeline",
    responses(
        (status = 200, description = "Stages retrieved successfully", body = ApiResponse<Vec<StageResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_stages(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StageResponse>>>, StatusCode> {
    trace!("Entering get_stages function");

    match lead_status::Entity::find()
        .order_by_asc(lead_status::Column::SortOrder)
        .all(&state.db)
        .await
    {
        Ok(stages) => {
            info!("Successfully retrieved {} stages", stages.len());
            Ok(Json(ApiResponse {
                data: stages.into_iter().map(StageResponse::from).collect(),
                message: "Stages retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve stages: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a pipeline stage
#[utoipa::path(
    put,
    path = "/api/v1/pipeline/stages/{stage_id}",
    tag = "pipeline",
    params(
        ("stage_id" = i32, Path, description = "Stage ID"),
    ),
    request_body = UpdateStageRequest,
    responses(
        (status = 200, description = "Stage updated successfully", body = ApiResponse<StageResponse>),
        (status = 404, description = "Stage not found", body = ErrorResponse),
        (status = 409, description = "Stage name already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn update_stage(
    Path(stage_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateStageRequest>>,
) -> Result<Json<ApiResponse<StageResponse>>, StatusCode> {
    trace!("Entering update_stage function for stage_id: {}", stage_id);

    let existing = match lead_status::Entity::find_by_id(stage_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Stage with ID {} not found for update", stage_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to look up stage {}: {}", stage_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Renames get the same duplicate check as creates.
    if let Some(name) = &request.name {
        if *name != existing.name {
            match lead_status::Entity::find()
                .filter(lead_status::Column::Name.eq(name.clone()))
                .one(&state.db)
                .await
            {
                Ok(Some(_)) => {
                    warn!("Stage name '{}' already in use", name);
                    return Err(StatusCode::CONFLICT);
                }
                Ok(None) => {}
                Err(db_error) => {
                    error!("Failed to check stage name uniqueness: {}", db_error);
                    return Err(StatusCode::INTERNAL_SERVER_ERROR);
                }
            }
        }
    }

    let mut active: lead_status::ActiveModel = existing.into();
    if let Some(name) = &request.name {
        active.name = Set(name.clone());
    }
    if let Some(sort_order) = request.sort_order {
        active.sort_order = Set(sort_order);
    }
    if let Some(color) = &request.color {
        active.color = Set(color.clone());
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Stage {} updated successfully", stage_id);
            state.cache.invalidate(BOARD_CACHE_KEY).await;
            Ok(Json(ApiResponse {
                data: StageResponse::from(updated),
                message: "Stage updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to update stage {}: {}", stage_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a pipeline stage. Refused while any lead still sits in it.
#[utoipa::path(
    delete,
    path = "/api/v1/pipeline/stages/{stage_id}",
    tag = "pipeline",
    params(
        ("stage_id" = i32, Path, description = "Stage ID"),
    ),
    responses(
        (status = 200, description = "Stage deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Stage not found", body = ErrorResponse),
        (status = 409, description = "Stage still holds leads", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_stage(
    Path(stage_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_stage function for stage_id: {}", stage_id);

    let lead_count = match lead::Entity::find()
        .filter(lead::Column::StatusId.eq(stage_id))
        .count(&state.db)
        .await
    {
        Ok(count) => count,
        Err(db_error) => {
            error!("Failed to count leads in stage {}: {}", stage_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    if lead_count > 0 {
        warn!(
            "Refusing to delete stage {}: {} leads still in it",
            stage_id, lead_count
        );
        return Err(StatusCode::CONFLICT);
    }

    match lead_status::Entity::delete_by_id(stage_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Stage {} deleted successfully", stage_id);
                state.cache.invalidate(BOARD_CACHE_KEY).await;
                Ok(Json(ApiResponse {
                    data: format!("Stage {} deleted", stage_id),
                    message: "Stage deleted successfully".to_string(),
                    success: true,
                }))
            } else {
                warn!("Stage {} not found for deletion", stage_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete stage {}: {}", stage_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get the kanban board: every stage in order with its leads
#[utoipa::path(
    get,
    path = "/api/v1/pipeline/board",
    tag = "pipeline",
    responses(
        (status = 200, description = "Board retrieved successfully", body = ApiResponse<PipelineBoard>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_board(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PipelineBoard>>, StatusCode> {
    trace!("Entering get_board function");

    if let Some(CachedData::Board(board)) = state.cache.get(BOARD_CACHE_KEY).await {
        debug!("Returning pipeline board from cache");
        return Ok(Json(ApiResponse {
            data: board,
            message: "Board retrieved from cache".to_string(),
            success: true,
        }));
    }

    let board = match compute::build_board(&state.db).await {
        Ok(board) => board,
        Err(compute_error) => {
            error!("Failed to build pipeline board: {}", compute_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    state
        .cache
        .insert(BOARD_CACHE_KEY.to_string(), CachedData::Board(board.clone()))
        .await;

    info!(
        "Pipeline board built with {} stages and {} leads",
        board.stages.len(),
        board.total_leads
    );
    Ok(Json(ApiResponse {
        data: board,
        message: "Board retrieved successfully".to_string(),
        success: true,
    }))
}
