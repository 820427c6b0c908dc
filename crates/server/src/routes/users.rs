//! Signup and login route handlers.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use tangelo_core::UserId;

use crate::error::{AppError, Result};
use crate::services::auth::{AuthService, token};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Signup response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: &'static str,
    pub user_id: UserId,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
    pub is_admin: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /users/signup` - register a new user.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    let user = AuthService::new(state.pool())
        .signup(&req.name, &req.email, &req.password, req.is_admin)
        .await?;

    tracing::info!(user_id = %user.id, "user created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            user_id: user.id,
        }),
    ))
}

/// `POST /users/login` - authenticate and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = AuthService::new(state.pool())
        .login(&req.email, &req.password)
        .await?;

    let secret = state.config().jwt_secret.expose_secret().as_bytes();
    let token = token::issue(&user, secret).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        is_admin: user.is_admin,
    }))
}
