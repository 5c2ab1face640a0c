//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myco_core::error::CoreError;
use myco_core::roles::ROLE_USER;
use myco_db::models::session::CreateSession;
use myco_db::models::user::{CreateUser, User, UserResponse};
use myco_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 30, message = "must be between 3 and 30 characters"))]
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// Trim the username and lower-case the email before validation.
    fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let input = input.normalized();
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    if let Some(existing) =
        UserRepo::find_by_email_or_username(&state.pool, &input.email, &input.username).await?
    {
        let taken = if existing.email == input.email {
            "Email is already registered"
        } else {
            "Username is already taken"
        };
        return Err(CoreError::Conflict(taken.into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = issue_tokens(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Unknown email, inactive account and wrong password are indistinguishable
/// to the client.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(issue_tokens(&state, &user).await?))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the session: the presented token is revoked and a new pair issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let hash = hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid or expired refresh token".into()))?;

    // Only the request that flips the session to revoked may rotate it.
    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(CoreError::Unauthorized("Invalid or expired refresh token".into()).into());
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))?;

    Ok(Json(issue_tokens(&state, &user).await?))
}

/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<MeResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))?;

    Ok(Json(MeResponse {
        user: UserResponse::from(&user),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign an access token, persist a new refresh session and build the response.
async fn issue_tokens(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, refresh_token_hash) = generate_refresh_token();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash,
            expires_at: jwt.refresh_expires_at(),
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt.access_token_ttl_secs(),
        user: UserResponse::from(user),
    })
}
