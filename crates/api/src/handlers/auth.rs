//! Handlers for email/password authentication (`/auth`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use drawstory_cache::SessionValue;
use drawstory_core::error::CoreError;
use drawstory_core::types::DbId;
use drawstory_core::validate::{validate_email, validate_password};
use drawstory_db::models::user::{CreateUser, UserResponse};
use drawstory_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Request body for `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Successful login/registration payload.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Generate a JWT for the user and open their session.
///
/// Registration and every login path (password or OAuth) go through here so
/// the session invariant holds: a token is only usable while its session key
/// exists.
pub(crate) async fn issue_session(state: &AppState, user_id: DbId) -> AppResult<String> {
    let token = generate_token(user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    state
        .sessions
        .set(
            user_id,
            &SessionValue {
                user_id,
                token: token.clone(),
            },
        )
        .await?;

    Ok(token)
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    if let Err(problem) = validate_email(&input.email) {
        return Err(AppError::Core(CoreError::Validation(problem)));
    }
    if let Err(problems) = validate_password(&input.password) {
        return Err(AppError::Core(CoreError::Validation(problems.join("; "))));
    }

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already in use".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
        },
    )
    .await?;

    let token = issue_session(&state, user.id).await?;

    // Welcome email is best-effort: failures are logged, never surfaced.
    let mailer = state.mailer.clone();
    let email = user.email.clone();
    let fullname = user.fullname.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_welcome(&email, fullname.as_deref()).await {
            tracing::warn!(error = %e, to = email, "Failed to send welcome email");
        }
    });

    tracing::info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into_response(),
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    // Social-only accounts have no password hash and cannot log in here.
    let hash = user.password_hash.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Please use your social provider to login".into(),
        ))
    })?;

    let verified = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let user = UserRepo::record_login(&state.pool, user.id)
        .await?
        .unwrap_or(user);
    let token = issue_session(&state, user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into_response(),
    }))
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.sessions.delete(auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
