//! Authentication Service
//!
//! Session management for the trading API plus error mapping for the auth
//! extractors. Sessions are bearer tokens held in memory: the platform mints
//! one through the internal surface after it has authenticated the user, and
//! the token dies on expiry, logout or restart.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::services::SqliteStore;
use crate::types::Session;

/// Authentication service managing active sessions.
#[derive(Clone)]
pub struct AuthService {
    /// Active sessions (token -> Session)
    sessions: Arc<DashMap<String, Session>>,
    /// Store used to verify accounts before minting sessions
    store: Arc<SqliteStore>,
    /// Session lifetime in milliseconds
    session_ttl_ms: i64,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(store: Arc<SqliteStore>, session_ttl_ms: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            store,
            session_ttl_ms,
        }
    }

    /// Mint a session for an account.
    pub fn issue_session(&self, account_id: &str) -> Result<Session, AuthError> {
        if self.store.get_account(account_id).is_none() {
            return Err(AuthError::AccountNotFound(account_id.to_string()));
        }

        let session = Session::new(account_id.to_string(), self.session_ttl_ms);
        self.sessions.insert(session.token.clone(), session.clone());
        info!("Issued session for account {}", account_id);
        Ok(session)
    }

    /// Validate a session token.
    pub fn validate_session(&self, token: &str) -> Option<Session> {
        // Clone out of the map before removing to avoid holding a ref
        let session = self.sessions.get(token).map(|s| s.clone())?;

        if session.is_expired() {
            self.sessions.remove(token);
            debug!("Dropped expired session for {}", session.account_id);
            return None;
        }

        Some(session)
    }

    /// Revoke a session. Returns true when a session was removed.
    pub fn revoke_session(&self, token: &str) -> bool {
        let removed = self.sessions.remove(token).is_some();
        if removed {
            debug!("Revoked session");
        }
        removed
    }

    /// Number of sessions currently held, expired or not.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Account not found")]
    AccountNotFound(String),

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Invalid internal key")]
    InvalidInternalKey,
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AuthError::AccountNotFound(_) => {
                (axum::http::StatusCode::NOT_FOUND, "Account not found")
            }
            AuthError::MissingCredentials => {
                (axum::http::StatusCode::UNAUTHORIZED, "Missing credentials")
            }
            AuthError::InvalidSession => (
                axum::http::StatusCode::UNAUTHORIZED,
                "Invalid or expired session",
            ),
            AuthError::InvalidInternalKey => {
                (axum::http::StatusCode::UNAUTHORIZED, "Invalid internal key")
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
