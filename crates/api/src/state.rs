use std::sync::Arc;

use drawstory_cache::SessionStore;
use drawstory_cloud::ObjectStorage;

use crate::config::ServerConfig;
use crate::email::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: drawstory_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session store backing login sessions (Redis in production).
    pub sessions: Arc<dyn SessionStore>,
    /// Object storage for scene images and analytics exports (S3 in production).
    pub storage: Arc<dyn ObjectStorage>,
    /// Outgoing email transport.
    pub mailer: Arc<Mailer>,
}
