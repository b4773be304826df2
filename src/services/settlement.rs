//! Settlement Engine
//!
//! Square-off orchestrator for intraday positions. Walks the holdings in
//! scope and closes each one in its own transaction, so one bad position
//! never blocks the rest of the batch. Failures are reported per symbol in
//! the batch result instead of failing the request.

use std::sync::Arc;

use tracing::{info, warn};

use crate::services::{QuoteCache, SqliteStore, StoreError};
use crate::types::{Holding, ProductType, SquareOffReport};

/// Errors surfaced by settlement.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("no price available")]
    PriceUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates intraday square-off batches.
#[derive(Clone)]
pub struct SettlementEngine {
    store: Arc<SqliteStore>,
    quotes: Arc<QuoteCache>,
}

impl SettlementEngine {
    /// Create a new settlement engine.
    pub fn new(store: Arc<SqliteStore>, quotes: Arc<QuoteCache>) -> Self {
        Self { store, quotes }
    }

    /// Square off every intraday holding of one account.
    ///
    /// Only enumeration can fail here; individual close-out failures land in
    /// the report's error list.
    pub fn square_off_account(&self, account_id: &str) -> Result<SquareOffReport, SettlementError> {
        let holdings = self
            .store
            .holdings_for_account(account_id, Some(ProductType::Intraday))?;
        Ok(self.square_off(holdings, &format!("account {}", account_id)))
    }

    /// Square off every intraday holding across all accounts.
    pub fn square_off_all(&self) -> Result<SquareOffReport, SettlementError> {
        let holdings = self.store.holdings_by_product(ProductType::Intraday)?;
        Ok(self.square_off(holdings, "all accounts"))
    }

    fn square_off(&self, holdings: Vec<Holding>, scope: &str) -> SquareOffReport {
        let total = holdings.len();
        let mut squared_off = 0;
        let mut errors = Vec::new();

        for holding in holdings {
            match self.settle(&holding) {
                Ok(()) => squared_off += 1,
                Err(e) => {
                    warn!(
                        "Square-off failed for {} (account {}): {}",
                        holding.symbol, holding.account_id, e
                    );
                    errors.push(format!("{}: {}", holding.symbol, e));
                }
            }
        }

        info!(
            "Square-off for {}: {}/{} closed, {} failed",
            scope,
            squared_off,
            total,
            errors.len()
        );

        SquareOffReport {
            squared_off,
            total,
            errors,
        }
    }

    /// Close one holding in its own transaction.
    fn settle(&self, holding: &Holding) -> Result<(), SettlementError> {
        let price = self
            .quotes
            .get_price(&holding.symbol)
            .ok_or_else(|| SettlementError::PriceUnavailable(holding.symbol.clone()))?;

        // None means the holding vanished between the listing and the
        // transaction. It is closed either way.
        self.store.settle_intraday_holding(&holding.id, price)?;
        Ok(())
    }
}
