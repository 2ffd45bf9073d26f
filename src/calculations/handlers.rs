use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{auth::services::AuthUser, error::ApiError, state::AppState};

use super::dto::{
    CalculationResponse, CreateCalculationRequest, Pagination, UpdateCalculationRequest,
};
use super::engine::CalculationKind;
use super::repo;

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/calculations", get(list_calculations))
        .route("/calculations/:id", get(get_calculation))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/calculations", post(create_calculation))
        .route("/calculations/:id", put(update_calculation).delete(delete_calculation))
}

// --- handlers ---

#[instrument(skip(state, payload))]
pub async fn create_calculation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCalculationRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CalculationResponse>), ApiError> {
    let kind = CalculationKind::parse(&payload.kind).map_err(|e| {
        warn!(tag = %payload.kind, "unsupported calculation type");
        ApiError::bad_request(e.to_string())
    })?;

    // Reject bad inputs before anything is persisted.
    kind.compute(&payload.inputs)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let row = repo::insert(&state.db, user_id, kind.as_str(), &payload.inputs).await?;

    info!(%user_id, calculation_id = %row.id, %kind, "calculation created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/calculations/{}", row.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(row.into())))
}

#[instrument(skip(state))]
pub async fn list_calculations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<CalculationResponse>>, ApiError> {
    let rows = repo::list_by_user(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(rows.into_iter().map(CalculationResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_calculation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let row = repo::get(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Calculation not found"))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_calculation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCalculationRequest>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let existing = repo::get(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Calculation not found"))?;

    // Stored tags are canonical; a row that no longer parses is corrupt.
    let kind = CalculationKind::parse(&existing.kind).map_err(|e| {
        error!(%id, tag = %existing.kind, error = %e, "stored calculation type is invalid");
        ApiError::internal("Internal Server Error")
    })?;

    kind.compute(&payload.inputs)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let row = repo::update_inputs(&state.db, user_id, id, &payload.inputs)
        .await?
        .ok_or_else(|| ApiError::not_found("Calculation not found"))?;

    info!(%user_id, calculation_id = %row.id, "calculation updated");
    Ok(Json(row.into()))
}

#[instrument(skip(state))]
pub async fn delete_calculation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repo::delete(&state.db, user_id, id).await?;

    if !deleted {
        return Err(ApiError::not_found("Calculation not found"));
    }

    info!(%user_id, calculation_id = %id, "calculation deleted");
    Ok(StatusCode::NO_CONTENT)
}
