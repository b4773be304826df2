/**
 * Authentication API
 *
 * Extractors guarding the two surfaces:
 * - Authenticated: Bearer session token minted for one account
 * - InternalAuth: shared key presented by the platform or a scheduler
 *
 * Plus the logout endpoint:
 * - DELETE /api/auth/session - Revoke the presented session
 */

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::delete,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::config::InternalAuthConfig;
use crate::services::{AuthError, AuthService, SqliteStore};
use crate::types::{Account, Session};
use crate::AppState;

/// State the auth extractors pull out of the app state.
#[derive(Clone)]
pub struct AuthState {
    pub auth: AuthService,
    pub store: Arc<SqliteStore>,
    pub internal: InternalAuthConfig,
}

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/session", delete(logout))
}

/// DELETE /api/auth/session
///
/// Revoke the presented session.
async fn logout(State(state): State<AppState>, auth: Authenticated) -> Json<LogoutResponse> {
    state.auth.revoke_session(&auth.session.token);
    Json(LogoutResponse { success: true })
}

/// Authenticated session extractor.
///
/// Use this in route handlers to require a valid session:
/// ```ignore
/// async fn my_handler(auth: Authenticated) -> impl IntoResponse {
///     let account = auth.account;
///     // ...
/// }
/// ```
pub struct Authenticated {
    pub session: Session,
    pub account: Account,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        // Get Authorization header
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        // Extract Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingCredentials)?;

        // Validate session
        let session = auth_state
            .auth
            .validate_session(token)
            .ok_or(AuthError::InvalidSession)?;

        // The account behind a live session can still disappear
        let account = auth_state
            .store
            .get_account(&session.account_id)
            .ok_or(AuthError::InvalidSession)?;

        Ok(Authenticated { session, account })
    }
}

/// Shared-key extractor for the internal surface.
pub struct InternalAuth;

#[axum::async_trait]
impl<S> FromRequestParts<S> for InternalAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        if !auth_state.internal.require_auth {
            return Ok(InternalAuth);
        }

        // Auth required with no key configured rejects everything
        let expected = &auth_state.internal.shared_key;
        if expected.is_empty() {
            return Err(AuthError::InvalidInternalKey);
        }

        let presented = parts
            .headers
            .get("X-Internal-Key")
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        if presented != expected {
            return Err(AuthError::InvalidInternalKey);
        }

        Ok(InternalAuth)
    }
}

/// Helper trait to extract AuthState from parent state.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        AuthState {
            auth: input.auth.clone(),
            store: input.store.clone(),
            internal: input.config.internal_auth.clone(),
        }
    }
}

/// Logout response.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}
