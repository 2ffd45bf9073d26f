use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest, TokenResponse},
        repo_types::User,
        services::{self, AuthUser, JwtKeys, RegisterError},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).delete(delete_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    let user = match services::register(&state.db, &payload).await {
        Ok(u) => u,
        Err(RegisterError::Internal(e)) => {
            error!(error = %e, "register failed");
            return Err(ApiError::internal("Internal Server Error"));
        }
        Err(e) => {
            warn!(email = %payload.email, username = %payload.username, error = %e, "registration rejected");
            return Err(ApiError::bad_request(e.to_string()));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.username = payload.username.trim().to_string();

    let keys = JwtKeys::from_ref(&state);
    let session =
        services::authenticate(&state.db, &keys, &payload.username, &payload.password).await?;

    match session {
        Some(token) => {
            info!(user_id = %token.user.id, "user logged in");
            Ok(Json(token))
        }
        None => {
            warn!(identifier = %payload.username, "login rejected");
            Err(ApiError::unauthorized("Invalid credentials"))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token subject no longer exists");
        ApiError::unauthorized("User not found")
    })?;

    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, ApiError> {
    let deleted = User::delete(&state.db, user_id).await?;

    if !deleted {
        return Err(ApiError::unauthorized("User not found"));
    }

    info!(%user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
