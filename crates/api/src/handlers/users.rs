//! Handlers for the `/users` resource (registration).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chirpy_core::credentials::validate_credentials;
use chirpy_db::models::user::{CreateUser, UserResponse};
use chirpy_db::repositories::UserRepo;
use serde::Deserialize;

use super::run_blocking;
use crate::auth::password::hash_password;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for `POST /api/users`.
///
/// Missing fields deserialize as empty strings and are rejected by
/// validation with a 400.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/users
///
/// Register a new user. The password is hashed before it reaches the
/// database; the response never includes the hash. A duplicate email yields
/// 409 via the `uq_users_email` constraint.
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_credentials(&input.email, &input.password)?;

    let password = input.password;
    let hashed_password = run_blocking(move || hash_password(&password)).await??;

    let create_dto = CreateUser {
        email: input.email.trim().to_string(),
        hashed_password,
    };
    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}
