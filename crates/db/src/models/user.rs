//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drawstory_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub fullname: Option<String>,
    /// `None` for social-only accounts.
    pub password_hash: Option<String>,
    /// OAuth provider name (`"google"`), `None` for password accounts.
    pub provider: Option<String>,
    /// Subject id at the OAuth provider.
    pub provider_id: Option<String>,
    pub last_login_at: Option<Timestamp>,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Strip credentials for API output.
    pub fn into_response(self) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email,
            fullname: self.fullname,
            provider: self.provider,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub fullname: Option<String>,
    pub provider: Option<String>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a password-based user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}

/// DTO for creating a social (OAuth) user.
#[derive(Debug, Clone)]
pub struct CreateSocialUser {
    pub email: String,
    pub provider: String,
    pub provider_id: String,
    pub fullname: Option<String>,
}

/// DTO for updating an existing user. All fields are optional; `None` leaves
/// the stored value unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub fullname: Option<String>,
}
