//! Order and Trade Types
//!
//! Orders and trades are the append-only audit trail of the simulator.
//! The settlement engine writes exactly one already-filled market order and
//! one linked trade per squared-off holding; neither record is ever updated
//! afterwards.

use serde::{Deserialize, Serialize};

use super::{OrderSide, OrderStatus, OrderType, ProductType};

/// An order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID
    pub id: String,
    /// Owning account ID
    pub account_id: String,
    /// Instrument symbol
    pub symbol: String,
    /// Buy or sell
    pub side: OrderSide,
    /// Market or limit
    pub order_type: OrderType,
    /// Product the order trades under
    pub product: ProductType,
    /// Absolute share count
    pub quantity: f64,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Price the order filled at, when filled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_price: Option<f64>,
    /// When the order filled (ms), when filled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled_at: Option<i64>,
    /// When the order was created (ms)
    pub created_at: i64,
}

impl Order {
    /// Create a market order that is already filled, as written by the
    /// settlement engine for a closing execution.
    pub fn filled_market(
        account_id: &str,
        symbol: &str,
        side: OrderSide,
        product: ProductType,
        quantity: f64,
        fill_price: f64,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            product,
            quantity,
            status: OrderStatus::Filled,
            fill_price: Some(fill_price),
            filled_at: Some(now),
            created_at: now,
        }
    }
}

/// An execution record linked to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Unique trade ID
    pub id: String,
    /// Order this execution belongs to
    pub order_id: String,
    /// Owning account ID
    pub account_id: String,
    /// Instrument symbol
    pub symbol: String,
    /// Buy or sell
    pub side: OrderSide,
    /// Executed share count
    pub quantity: f64,
    /// Execution price
    pub price: f64,
    /// Notional value: price * quantity
    pub total: f64,
    /// When the execution happened (ms)
    pub executed_at: i64,
}

impl Trade {
    /// Create the execution record for a filled order at the given price.
    pub fn execution_of(order: &Order, price: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            account_id: order.account_id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            price,
            total: price * order.quantity,
            executed_at: order.filled_at.unwrap_or(order.created_at),
        }
    }
}
