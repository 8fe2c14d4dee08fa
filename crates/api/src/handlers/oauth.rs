//! Handlers for Google OAuth sign-in (`/oauth/google`).
//!
//! The client performs the browser-side consent flow and posts the resulting
//! authorization code here. The server exchanges the code for an ID token,
//! verifies it against Google's tokeninfo endpoint, and then registers or
//! logs in the matching user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use drawstory_core::error::CoreError;
use drawstory_core::validate::validate_email;
use drawstory_db::models::user::{CreateSocialUser, UpdateUser, User};
use drawstory_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::{issue_session, AuthResponse};
use crate::state::AppState;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Request body for both Google OAuth endpoints.
#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    /// Authorization code from the client-side consent flow.
    pub code: String,
}

/// Verified Google identity.
#[derive(Debug)]
struct GoogleProfile {
    subject: String,
    email: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    aud: String,
    sub: String,
    email: String,
    name: Option<String>,
}

/// Exchange the authorization code for an ID token and verify it.
///
/// The `postmessage` redirect URI matches the popup-based client flow. The
/// ID token is verified server-side via Google's tokeninfo endpoint, which
/// checks the signature and expiry; we additionally check the audience is our
/// own client id.
async fn verify_google_code(state: &AppState, code: &str) -> AppResult<GoogleProfile> {
    let client = reqwest::Client::new();

    let exchange: TokenExchangeResponse = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", state.config.google.client_id.as_str()),
            ("client_secret", state.config.google.client_secret.as_str()),
            ("redirect_uri", "postmessage"),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::InternalError(format!("Google token exchange failed: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::InternalError(format!("Google token exchange failed: {e}")))?;

    let id_token = exchange.id_token.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Google authorization code".into(),
        ))
    })?;

    let claims: IdTokenClaims = client
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", id_token.as_str())])
        .send()
        .await
        .map_err(|e| AppError::InternalError(format!("Google token verification failed: {e}")))?
        .error_for_status()
        .map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid Google ID token".into()))
        })?
        .json()
        .await
        .map_err(|e| AppError::InternalError(format!("Google token verification failed: {e}")))?;

    if claims.aud != state.config.google.client_id {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Google token was issued for a different application".into(),
        )));
    }

    Ok(GoogleProfile {
        subject: claims.sub,
        email: claims.email,
        name: claims.name,
    })
}

/// Log an existing Google user in: backfill the display name if Google now
/// provides one, stamp the login, and open a session.
async fn login_existing(
    state: &AppState,
    user: User,
    profile: &GoogleProfile,
) -> AppResult<AuthResponse> {
    let user = if user.fullname.is_none() && profile.name.is_some() {
        UserRepo::update(
            &state.pool,
            user.id,
            &UpdateUser {
                fullname: profile.name.clone(),
            },
        )
        .await?
        .unwrap_or(user)
    } else {
        user
    };

    let user = UserRepo::record_login(&state.pool, user.id)
        .await?
        .unwrap_or(user);
    let token = issue_session(state, user.id).await?;

    tracing::info!(user_id = %user.id, "Google user logged in");
    Ok(AuthResponse {
        token,
        user: user.into_response(),
    })
}

/// POST /oauth/google
///
/// Register with Google, or fall through to login when the Google account is
/// already registered. A password account with the same email is rejected.
pub async fn register_google(
    State(state): State<AppState>,
    Json(input): Json<GoogleAuthRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let profile = verify_google_code(&state, &input.code).await?;

    if let Err(problem) = validate_email(&profile.email) {
        return Err(AppError::Core(CoreError::Validation(problem)));
    }

    if let Some(existing) = UserRepo::find_by_email(&state.pool, &profile.email).await? {
        if existing.provider.as_deref() == Some("google") {
            let response = login_existing(&state, existing, &profile).await?;
            return Ok((StatusCode::OK, Json(response)));
        }
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already in use".into(),
        )));
    }

    let user = UserRepo::create_social(
        &state.pool,
        &CreateSocialUser {
            email: profile.email.clone(),
            provider: "google".to_string(),
            provider_id: profile.subject.clone(),
            fullname: profile.name.clone(),
        },
    )
    .await?;

    let token = issue_session(&state, user.id).await?;

    let mailer = state.mailer.clone();
    let email = user.email.clone();
    let fullname = user.fullname.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_welcome(&email, fullname.as_deref()).await {
            tracing::warn!(error = %e, to = email, "Failed to send welcome email");
        }
    });

    tracing::info!(user_id = %user.id, "Google user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into_response(),
        }),
    ))
}

/// POST /oauth/google/login
///
/// Login only: the Google account must already be registered, and a password
/// account with the same email must use the password flow instead.
pub async fn login_google(
    State(state): State<AppState>,
    Json(input): Json<GoogleAuthRequest>,
) -> AppResult<Json<AuthResponse>> {
    let profile = verify_google_code(&state, &input.code).await?;

    let user = UserRepo::find_by_email(&state.pool, &profile.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    if user.provider.as_deref() != Some("google") {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Please use email and password to login".into(),
        )));
    }

    let response = login_existing(&state, user, &profile).await?;
    Ok(Json(response))
}
