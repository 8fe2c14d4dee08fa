//! Session cache: a flat key-value store of active sessions keyed by user id.
//!
//! A session exists while its key is present; logout deletes the key, which
//! immediately invalidates every access token for that user (the auth
//! middleware requires both a valid JWT and a live session).
//!
//! The Redis client is constructed once at startup via
//! [`RedisSessionStore::connect`] and injected where needed -- no global
//! registry. Tests use [`InMemorySessionStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use drawstory_core::types::DbId;

/// Prefix for all session keys, namespacing them in a shared Redis.
const SESSION_KEY_PREFIX: &str = "session:";

/// The value stored per active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionValue {
    pub user_id: DbId,
    pub token: String,
}

/// Errors from the session store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value session storage contract consumed by the auth layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store (or replace) the session for a user.
    async fn set(&self, user_id: DbId, value: &SessionValue) -> Result<(), CacheError>;

    /// Fetch the session for a user, `None` when no session is live.
    async fn get(&self, user_id: DbId) -> Result<Option<SessionValue>, CacheError>;

    /// Delete the session for a user. Returns `true` if a key was removed.
    async fn delete(&self, user_id: DbId) -> Result<bool, CacheError>;
}

fn session_key(user_id: DbId) -> String {
    format!("{SESSION_KEY_PREFIX}{user_id}")
}

/// Redis-backed session store used in production.
#[derive(Clone)]
pub struct RedisSessionStore {
    manager: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to Redis and return a store wrapping a shared connection
    /// manager (auto-reconnecting, cheap to clone).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        tracing::info!("Connected to Redis session store");
        Ok(Self { manager })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, user_id: DbId, value: &SessionValue) -> Result<(), CacheError> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(session_key(user_id), payload).await?;
        Ok(())
    }

    async fn get(&self, user_id: DbId) -> Result<Option<SessionValue>, CacheError> {
        let mut conn = self.manager.clone();
        let payload: Option<String> = conn.get(session_key(user_id)).await?;
        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: DbId) -> Result<bool, CacheError> {
        let mut conn = self.manager.clone();
        let removed: i64 = conn.del(session_key(user_id)).await?;
        Ok(removed > 0)
    }
}

/// In-memory session store for tests.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionValue>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set(&self, user_id: DbId, value: &SessionValue) -> Result<(), CacheError> {
        self.sessions
            .lock()
            .await
            .insert(session_key(user_id), value.clone());
        Ok(())
    }

    async fn get(&self, user_id: DbId) -> Result<Option<SessionValue>, CacheError> {
        Ok(self.sessions.lock().await.get(&session_key(user_id)).cloned())
    }

    async fn delete(&self, user_id: DbId) -> Result<bool, CacheError> {
        Ok(self.sessions.lock().await.remove(&session_key(user_id)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let store = InMemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let value = SessionValue {
            user_id,
            token: "token-abc".to_string(),
        };

        assert!(store.get(user_id).await.unwrap().is_none());

        store.set(user_id, &value).await.unwrap();
        assert_eq!(store.get(user_id).await.unwrap(), Some(value));

        assert!(store.delete(user_id).await.unwrap());
        assert!(store.get(user_id).await.unwrap().is_none());
        assert!(!store.delete(user_id).await.unwrap(), "second delete is a no-op");
    }

    #[test]
    fn test_session_key_prefix() {
        let id = Uuid::nil();
        assert_eq!(session_key(id), format!("session:{id}"));
    }
}
