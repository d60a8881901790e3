//! Handler for `POST /api/login`.

use axum::extract::State;
use axum::Json;
use chirpy_core::credentials::validate_credentials;
use chirpy_core::error::CoreError;
use chirpy_db::models::user::UserResponse;
use chirpy_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use super::run_blocking;
use crate::auth::jwt::make_jwt;
use crate::auth::password::{verify_dummy, verify_password};
use crate::error::{AppError, AppResult, INVALID_CREDENTIALS};
use crate::extract::AppJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Requested token lifetime; clamped to the configured maximum.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Successful login: the public user fields plus a bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login
///
/// Authenticate with email + password and issue an access token. An unknown
/// email and a wrong password produce the same 401 response.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_credentials(&input.email, &input.password)?;

    let password = input.password;
    let Some(user) = UserRepo::find_by_email(&state.pool, input.email.trim()).await? else {
        // Match the Argon2 cost of a wrong password.
        run_blocking(move || verify_dummy(&password)).await?;
        tracing::debug!("Login for unknown email");
        return Err(AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())));
    };

    let stored_hash = user.hashed_password.clone();
    run_blocking(move || verify_password(&stored_hash, &password)).await??;

    let jwt = &state.config.jwt;
    let token = make_jwt(user.id, jwt.secret(), jwt.ttl_for(input.expires_in_seconds))?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
    }))
}
