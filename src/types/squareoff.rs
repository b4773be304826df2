//! Square-Off Types
//!
//! Results produced when intraday positions are force-closed, either for a
//! single account or across the whole book.

use serde::{Deserialize, Serialize};

use crate::types::order::{Order, Trade};

/// Outcome of a square-off batch.
///
/// One report covers one batch: every intraday holding in scope was attempted
/// exactly once, and failures are collected per symbol rather than aborting
/// the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareOffReport {
    /// Number of holdings successfully closed
    pub squared_off: usize,
    /// Number of holdings that were in scope
    pub total: usize,
    /// Per-symbol failure descriptions, empty when everything closed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SquareOffReport {
    /// True when every holding in scope was closed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.squared_off == self.total
    }
}

/// Everything written by one settlement transaction.
///
/// Returned so callers can log or inspect what a close-out did without
/// re-reading the database.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    /// The holding that was closed
    pub holding_id: String,
    /// Account the holding belonged to
    pub account_id: String,
    /// Instrument symbol
    pub symbol: String,
    /// The closing order appended to history
    pub order: Order,
    /// The execution record linked to the order
    pub trade: Trade,
    /// Profit or loss realized by the close
    pub realized_pnl: f64,
    /// Amount credited to the account balance
    pub balance_delta: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report() {
        let report = SquareOffReport {
            squared_off: 3,
            total: 3,
            errors: vec![],
        };

        assert!(report.is_clean());
    }

    #[test]
    fn test_partial_report_is_not_clean() {
        let report = SquareOffReport {
            squared_off: 2,
            total: 3,
            errors: vec!["TCS: no price available".to_string()],
        };

        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_serialization_omits_empty_errors() {
        let report = SquareOffReport {
            squared_off: 1,
            total: 1,
            errors: vec![],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"squaredOff\":1"));
        assert!(json.contains("\"total\":1"));
        assert!(!json.contains("errors"));
    }

    #[test]
    fn test_report_serialization_includes_errors() {
        let report = SquareOffReport {
            squared_off: 0,
            total: 1,
            errors: vec!["INFY: no price available".to_string()],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"errors\":[\"INFY: no price available\"]"));
    }

    #[test]
    fn test_report_deserialization_defaults_errors() {
        let report: SquareOffReport =
            serde_json::from_str("{\"squaredOff\":2,\"total\":2}").unwrap();

        assert_eq!(report.squared_off, 2);
        assert!(report.errors.is_empty());
    }
}
