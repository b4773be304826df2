//! Integration tests for the intraday settlement engine
//!
//! Tests cover:
//! - Full ledger effects of closing a single position
//! - Batch square-off isolation and reporting
//! - Quote staleness and retry behavior

use std::sync::Arc;

use stockpit::services::{QuoteCache, SettlementEngine, SqliteStore};
use stockpit::types::*;

fn setup() -> (SettlementEngine, Arc<SqliteStore>, Arc<QuoteCache>) {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let quotes = Arc::new(QuoteCache::new(60_000));
    let engine = SettlementEngine::new(store.clone(), quotes.clone());
    (engine, store, quotes)
}

fn open_account(store: &SqliteStore, balance: f64) -> Account {
    let account = Account::new("Integration Trader", balance, 0.0);
    store.create_account(&account).unwrap();
    account
}

fn open_intraday(
    store: &SqliteStore,
    account: &Account,
    symbol: &str,
    quantity: f64,
    avg_price: f64,
) -> Holding {
    let holding = Holding::new(&account.id, symbol, quantity, avg_price, ProductType::Intraday);
    store.upsert_holding(&holding).unwrap();
    holding
}

// =============================================================================
// Single Close-Out Tests
// =============================================================================

mod closeout_tests {
    use super::*;

    #[test]
    fn test_long_close_writes_full_ledger() {
        let (engine, store, quotes) = setup();
        let account = open_account(&store, 100_000.0);
        let holding = open_intraday(&store, &account, "INFY", 50.0, 200.0);
        quotes.update("INFY", 220.0);

        let report = engine.square_off_account(&account.id).unwrap();
        assert_eq!(report.squared_off, 1);
        assert_eq!(report.total, 1);
        assert!(report.errors.is_empty());

        // The position is closed.
        assert!(store.get_holding(&holding.id).is_none());

        // A filled market order was appended.
        let orders = store.orders_for_account(&account.id, 10).unwrap();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.symbol, "INFY");
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.product, ProductType::Intraday);
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.quantity, 50.0);
        assert_eq!(order.fill_price, Some(220.0));

        // A trade linked to that order was appended.
        let trades = store.trades_for_account(&account.id, 10).unwrap();
        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.order_id, order.id);
        assert_eq!(trade.side, OrderSide::Sell);
        assert_eq!(trade.price, 220.0);
        assert_eq!(trade.total, 11_000.0);

        // Sale proceeds came back to the equity balance.
        let after = store.get_account(&account.id).unwrap();
        assert_eq!(after.equity_balance, 111_000.0);
    }

    #[test]
    fn test_short_close_buys_back_and_credits_pnl() {
        let (engine, store, quotes) = setup();
        let account = open_account(&store, 100_000.0);
        open_intraday(&store, &account, "RELIANCE", -100.0, 500.0);
        quotes.update("RELIANCE", 480.0);

        let report = engine.square_off_account(&account.id).unwrap();
        assert!(report.is_clean());

        let orders = store.orders_for_account(&account.id, 10).unwrap();
        assert_eq!(orders[0].side, OrderSide::Buy);
        assert_eq!(orders[0].quantity, 100.0);

        let trades = store.trades_for_account(&account.id, 10).unwrap();
        assert_eq!(trades[0].total, 48_000.0);

        // Only the P&L moves the balance for a short.
        let after = store.get_account(&account.id).unwrap();
        assert_eq!(after.equity_balance, 102_000.0);
    }

    #[test]
    fn test_losing_short_debits_balance() {
        let (engine, store, quotes) = setup();
        let account = open_account(&store, 100_000.0);
        open_intraday(&store, &account, "RELIANCE", -100.0, 500.0);
        quotes.update("RELIANCE", 520.0);

        engine.square_off_account(&account.id).unwrap();

        let after = store.get_account(&account.id).unwrap();
        assert_eq!(after.equity_balance, 98_000.0);
    }

    #[test]
    fn test_second_square_off_finds_nothing() {
        let (engine, store, quotes) = setup();
        let account = open_account(&store, 100_000.0);
        open_intraday(&store, &account, "INFY", 10.0, 1500.0);
        quotes.update("INFY", 1510.0);

        let first = engine.square_off_account(&account.id).unwrap();
        assert_eq!(first.squared_off, 1);

        let second = engine.square_off_account(&account.id).unwrap();
        assert_eq!(second.squared_off, 0);
        assert_eq!(second.total, 0);
        assert!(second.is_clean());
    }
}

// =============================================================================
// Batch Square-Off Tests
// =============================================================================

mod square_off_tests {
    use super::*;

    #[test]
    fn test_missing_quote_does_not_abort_the_batch() {
        let (engine, store, quotes) = setup();
        let account = open_account(&store, 100_000.0);
        open_intraday(&store, &account, "INFY", 10.0, 100.0);
        open_intraday(&store, &account, "SBIN", 20.0, 50.0);
        open_intraday(&store, &account, "TCS", 5.0, 3000.0);
        quotes.update("INFY", 110.0);
        quotes.update("SBIN", 55.0);

        let report = engine.square_off_account(&account.id).unwrap();

        assert_eq!(report.squared_off, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.errors, vec!["TCS: no price available".to_string()]);

        // The failed position stays open and settles once a quote arrives.
        quotes.update("TCS", 3100.0);
        let retry = engine.square_off_account(&account.id).unwrap();
        assert_eq!(retry.squared_off, 1);
        assert_eq!(retry.total, 1);
        assert!(retry.is_clean());

        // 10 * 110 + 20 * 55 + 5 * 3100 in proceeds across both batches.
        let after = store.get_account(&account.id).unwrap();
        assert_eq!(after.equity_balance, 100_000.0 + 1100.0 + 1100.0 + 15_500.0);
    }

    #[test]
    fn test_account_with_no_positions() {
        let (engine, store, _) = setup();
        let account = open_account(&store, 100_000.0);

        let report = engine.square_off_account(&account.id).unwrap();

        assert_eq!(report.squared_off, 0);
        assert_eq!(report.total, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_delivery_positions_survive_square_off() {
        let (engine, store, quotes) = setup();
        let account = open_account(&store, 100_000.0);
        open_intraday(&store, &account, "INFY", 10.0, 1500.0);
        let delivery = Holding::new(&account.id, "HDFC", 5.0, 1600.0, ProductType::Delivery);
        store.upsert_holding(&delivery).unwrap();
        quotes.update("INFY", 1510.0);
        quotes.update("HDFC", 1700.0);

        let report = engine.square_off_account(&account.id).unwrap();

        assert_eq!(report.total, 1);
        assert!(store.get_holding(&delivery.id).is_some());
    }

    #[test]
    fn test_scheduled_run_spans_every_account() {
        let (engine, store, quotes) = setup();
        let a = open_account(&store, 100_000.0);
        let b = open_account(&store, 100_000.0);
        open_intraday(&store, &a, "INFY", 10.0, 100.0);
        open_intraday(&store, &a, "TCS", 5.0, 3000.0);
        open_intraday(&store, &b, "SBIN", -20.0, 50.0);
        quotes.update("INFY", 110.0);
        quotes.update("TCS", 3100.0);
        quotes.update("SBIN", 45.0);

        let report = engine.square_off_all().unwrap();

        assert_eq!(report.squared_off, 3);
        assert_eq!(report.total, 3);
        assert!(store.holdings_by_product(ProductType::Intraday).unwrap().is_empty());

        // Short profit of 100 for account b.
        let b_after = store.get_account(&b.id).unwrap();
        assert_eq!(b_after.equity_balance, 100_100.0);
    }

    #[test]
    fn test_stale_quotes_never_settle_positions() {
        let store = Arc::new(SqliteStore::new_in_memory().unwrap());
        // Zero tolerance makes every quote stale on arrival.
        let quotes = Arc::new(QuoteCache::new(0));
        let engine = SettlementEngine::new(store.clone(), quotes.clone());

        let account = open_account(&store, 100_000.0);
        open_intraday(&store, &account, "INFY", 10.0, 1500.0);
        quotes.update("INFY", 1510.0);

        let report = engine.square_off_account(&account.id).unwrap();

        assert_eq!(report.squared_off, 0);
        assert_eq!(report.total, 1);
        assert_eq!(report.errors, vec!["INFY: no price available".to_string()]);
    }
}

// =============================================================================
// History Tests
// =============================================================================

mod history_tests {
    use super::*;

    #[test]
    fn test_repeated_closes_accumulate_history() {
        let (engine, store, quotes) = setup();
        let account = open_account(&store, 100_000.0);
        quotes.update("INFY", 1510.0);

        // Open and close the same symbol twice.
        for _ in 0..2 {
            open_intraday(&store, &account, "INFY", 10.0, 1500.0);
            let report = engine.square_off_account(&account.id).unwrap();
            assert!(report.is_clean());
        }

        let orders = store.orders_for_account(&account.id, 10).unwrap();
        let trades = store.trades_for_account(&account.id, 10).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(trades.len(), 2);

        // Each trade points at a distinct order.
        assert_ne!(trades[0].order_id, trades[1].order_id);

        let limited = store.orders_for_account(&account.id, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
