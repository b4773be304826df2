//! P&L Calculator
//!
//! Pure close-out arithmetic for intraday positions. Given an entry price, an
//! exit price and a quantity, computes the realized profit or loss and the
//! amount to credit back to the account balance.
//!
//! The two sides settle differently on purpose. A short position reserves no
//! principal when opened, so only the profit or loss moves the balance. A long
//! position returns its full notional sale proceeds on close, on the
//! assumption that the entry debit was taken when the position was opened.

use serde::Serialize;

use crate::types::Holding;

/// Result of closing out a single position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePnl {
    /// Profit (positive) or loss (negative) realized by the close
    pub realized_pnl: f64,
    /// Amount added to the account balance
    pub balance_delta: f64,
}

/// Compute the close-out result for a position.
///
/// `quantity` is the position size as a magnitude; the direction comes from
/// `is_short`.
pub fn closeout(is_short: bool, entry_price: f64, exit_price: f64, quantity: f64) -> ClosePnl {
    if is_short {
        // Short: profit when the price fell. Only the P&L touches the balance.
        let realized_pnl = (entry_price - exit_price) * quantity;
        ClosePnl {
            realized_pnl,
            balance_delta: realized_pnl,
        }
    } else {
        // Long: profit when the price rose. The full sale proceeds come back.
        let realized_pnl = (exit_price - entry_price) * quantity;
        ClosePnl {
            realized_pnl,
            balance_delta: exit_price * quantity,
        }
    }
}

/// Compute the close-out result for a holding at the given exit price.
pub fn closeout_holding(holding: &Holding, exit_price: f64) -> ClosePnl {
    closeout(
        holding.is_short(),
        holding.avg_price,
        exit_price,
        holding.abs_quantity(),
    )
}
