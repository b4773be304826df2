//! Holding Types
//!
//! One holding row per (account, symbol, product). Quantity is signed:
//! positive for long positions, negative for short. A holding with zero
//! quantity never exists; closing a position deletes the row.

use serde::{Deserialize, Serialize};

use super::{OrderSide, ProductType};

/// An open position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Unique holding ID
    pub id: String,
    /// Owning account ID
    pub account_id: String,
    /// Instrument symbol (uppercase ticker)
    pub symbol: String,
    /// Signed share count: positive = long, negative = short
    pub quantity: f64,
    /// Average entry price
    pub avg_price: f64,
    /// Product the position is held under
    pub product: ProductType,
    /// When the position was opened (ms)
    pub created_at: i64,
    /// Last fill that touched this position (ms)
    pub updated_at: i64,
}

impl Holding {
    /// Create a new holding.
    pub fn new(
        account_id: &str,
        symbol: &str,
        quantity: f64,
        avg_price: f64,
        product: ProductType,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            symbol: symbol.trim().to_uppercase(),
            quantity,
            avg_price,
            product,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this is a short position.
    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }

    /// Absolute share count.
    pub fn abs_quantity(&self) -> f64 {
        self.quantity.abs()
    }

    /// Side of the order that closes this position: buy back a short,
    /// sell out a long.
    pub fn closing_side(&self) -> OrderSide {
        if self.is_short() {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_holding() {
        let holding = Holding::new("acct-1", "tcs", 50.0, 200.0, ProductType::Intraday);

        assert_eq!(holding.symbol, "TCS");
        assert!(!holding.is_short());
        assert_eq!(holding.abs_quantity(), 50.0);
        assert_eq!(holding.closing_side(), OrderSide::Sell);
    }

    #[test]
    fn test_short_holding() {
        let holding = Holding::new("acct-1", "INFY", -100.0, 500.0, ProductType::Intraday);

        assert!(holding.is_short());
        assert_eq!(holding.abs_quantity(), 100.0);
        assert_eq!(holding.closing_side(), OrderSide::Buy);
    }

    #[test]
    fn test_holding_serialization() {
        let holding = Holding {
            id: "h-1".to_string(),
            account_id: "acct-1".to_string(),
            symbol: "RELIANCE".to_string(),
            quantity: -25.0,
            avg_price: 2400.0,
            product: ProductType::Intraday,
            created_at: 1704067200000,
            updated_at: 1704067200000,
        };

        let json = serde_json::to_string(&holding).unwrap();
        assert!(json.contains("\"accountId\":\"acct-1\""));
        assert!(json.contains("\"avgPrice\":2400.0"));
        assert!(json.contains("\"product\":\"intraday\""));
        assert!(json.contains("\"quantity\":-25.0"));
    }

    #[test]
    fn test_holding_deserialization() {
        let json = r#"{
            "id": "h-2",
            "accountId": "acct-9",
            "symbol": "SBIN",
            "quantity": 10.0,
            "avgPrice": 610.5,
            "product": "delivery",
            "createdAt": 1704067200000,
            "updatedAt": 1704067200000
        }"#;

        let holding: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(holding.product, ProductType::Delivery);
        assert_eq!(holding.closing_side(), OrderSide::Sell);
    }
}
