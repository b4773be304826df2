//! Authentication Types
//!
//! Bearer-token sessions for the trading API. Sessions are minted by the
//! platform through the internal surface and live in memory until they
//! expire or are revoked.

use serde::{Deserialize, Serialize};

/// An active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session token presented as a Bearer credential
    pub token: String,
    /// Account the session belongs to
    pub account_id: String,
    /// When the session was created (ms)
    pub created_at: i64,
    /// When the session expires (ms)
    pub expires_at: i64,
}

impl Session {
    /// Create a new session for an account with the given lifetime.
    pub fn new(account_id: String, ttl_ms: i64) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let token = uuid::Uuid::new_v4().to_string();

        Self {
            token,
            account_id,
            created_at: now,
            expires_at: now + ttl_ms,
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp_millis() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new("acct-1".to_string(), 60_000);

        assert_eq!(session.account_id, "acct-1");
        assert!(!session.is_expired());
        assert_eq!(session.expires_at - session.created_at, 60_000);
    }

    #[test]
    fn test_session_token_is_uuid() {
        let session = Session::new("acct-1".to_string(), 60_000);

        assert_eq!(session.token.len(), 36);
        assert!(session.token.contains('-'));
    }

    #[test]
    fn test_session_expiry() {
        let mut session = Session::new("acct-1".to_string(), 60_000);
        session.expires_at = session.created_at - 1;

        assert!(session.is_expired());
    }

    #[test]
    fn test_session_serialization() {
        let session = Session {
            token: "token-1".to_string(),
            account_id: "acct-1".to_string(),
            created_at: 1704067200000,
            expires_at: 1704153600000,
        };

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"token\":\"token-1\""));
        assert!(json.contains("\"accountId\":\"acct-1\""));
        assert!(json.contains("\"expiresAt\":1704153600000"));
    }
}
