//! Handlers for the `/chirps` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chirpy_core::chirp::validate_chirp_body;
use chirpy_core::error::CoreError;
use chirpy_db::models::chirp::{Chirp, CreateChirp};
use chirpy_db::repositories::{ChirpRepo, UserRepo};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult, INVALID_TOKEN};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/chirps`. The author comes from the token.
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    #[serde(default)]
    pub body: String,
}

/// POST /api/chirps
///
/// Create a chirp owned by the authenticated user. Returns 201 Created.
pub async fn create_chirp(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<CreateChirpRequest>,
) -> AppResult<(StatusCode, Json<Chirp>)> {
    validate_chirp_body(&input.body)?;

    // A still-valid token can outlive its user (e.g. after an admin reset).
    if UserRepo::find_by_id(&state.pool, auth_user.user_id).await?.is_none() {
        tracing::debug!(user_id = %auth_user.user_id, "Token subject no longer exists");
        return Err(AppError::Core(CoreError::Unauthorized(INVALID_TOKEN.into())));
    }

    let create_dto = CreateChirp {
        body: input.body,
        user_id: auth_user.user_id,
    };
    let chirp = ChirpRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(chirp_id = %chirp.id, user_id = %chirp.user_id, "Chirp created");

    Ok((StatusCode::CREATED, Json(chirp)))
}

/// GET /api/chirps
///
/// List all chirps, oldest first.
pub async fn list_chirps(State(state): State<AppState>) -> AppResult<Json<Vec<Chirp>>> {
    let chirps = ChirpRepo::list_all(&state.pool).await?;
    Ok(Json(chirps))
}

/// GET /api/chirps/{chirp_id}
///
/// Get a single chirp. A non-UUID id is a 400, an unknown one a 404.
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> AppResult<Json<Chirp>> {
    let id = Uuid::parse_str(&chirp_id)
        .map_err(|_| AppError::BadRequest(format!("Invalid chirp ID: {chirp_id}")))?;

    let chirp = ChirpRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Chirp", id }))?;

    Ok(Json(chirp))
}
