//! Account Types
//!
//! A trading account holds the simulator cash balances. The equity balance
//! funds intraday and delivery positions; the derivatives balance belongs to
//! the platform's F&O segment and is carried here untouched.

use serde::{Deserialize, Serialize};

/// A virtual trading account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Cash available for equity products (intraday and delivery)
    pub equity_balance: f64,
    /// Cash reserved for the derivatives segment
    pub derivatives_balance: f64,
    /// When the account was created (ms)
    pub created_at: i64,
    /// Last balance mutation (ms)
    pub updated_at: i64,
}

impl Account {
    /// Create a new account with the given starting balances.
    pub fn new(name: &str, equity_balance: f64, derivatives_balance: f64) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            equity_balance,
            derivatives_balance,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_creation() {
        let account = Account::new("trader-one", 1_000_000.0, 100_000.0);

        assert_eq!(account.name, "trader-one");
        assert_eq!(account.equity_balance, 1_000_000.0);
        assert_eq!(account.derivatives_balance, 100_000.0);
        assert_eq!(account.created_at, account.updated_at);
        assert_eq!(account.id.len(), 36);
    }

    #[test]
    fn test_account_serialization() {
        let account = Account {
            id: "acct-1".to_string(),
            name: "trader".to_string(),
            equity_balance: 500.0,
            derivatives_balance: 0.0,
            created_at: 1704067200000,
            updated_at: 1704067200000,
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("\"equityBalance\":500.0"));
        assert!(json.contains("\"derivativesBalance\":0.0"));
        assert!(json.contains("\"createdAt\":1704067200000"));
    }
}
