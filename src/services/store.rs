//! SQLite persistence layer for accounts, holdings and trade history.
//!
//! All trading state lives here:
//! - Accounts with per-segment cash balances
//! - Open holdings (one row per account, symbol and product)
//! - Append-only order and trade history
//!
//! Settlement runs inside this module so that the order insert, the trade
//! insert, the balance credit and the holding delete commit or roll back as
//! one unit.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, Transaction};
use tracing::{debug, error, info};

use crate::services::pnl;
use crate::types::{Account, Holding, Order, ParseEnumError, ProductType, SettlementRecord, Trade};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("account not found")]
    AccountNotFound(String),

    #[error("not an intraday position")]
    NotIntraday(String),
}

/// SQLite store for all trading state.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        // Accounts table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                equity_balance REAL NOT NULL,
                derivatives_balance REAL NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        // Holdings table: one open position per account, symbol and product
        conn.execute(
            "CREATE TABLE IF NOT EXISTS holdings (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                quantity REAL NOT NULL,
                avg_price REAL NOT NULL,
                product TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(account_id, symbol, product)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_holdings_account ON holdings(account_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_holdings_product ON holdings(product)",
            [],
        )?;

        // Order history table (append-only)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                side TEXT NOT NULL,
                order_type TEXT NOT NULL,
                product TEXT NOT NULL,
                quantity REAL NOT NULL,
                status TEXT NOT NULL,
                fill_price REAL,
                filled_at INTEGER,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_orders_account
             ON orders(account_id, created_at DESC)",
            [],
        )?;

        // Trade history table (append-only, one row per execution)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS trades (
                id TEXT PRIMARY KEY,
                order_id TEXT NOT NULL,
                account_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                side TEXT NOT NULL,
                quantity REAL NOT NULL,
                price REAL NOT NULL,
                total REAL NOT NULL,
                executed_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_trades_account
             ON trades(account_id, executed_at DESC)",
            [],
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }

    // ========== Account Methods ==========

    /// Insert a new account.
    pub fn create_account(&self, account: &Account) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO accounts (id, name, equity_balance, derivatives_balance, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.id,
                account.name,
                account.equity_balance,
                account.derivatives_balance,
                account.created_at,
                account.updated_at,
            ],
        )?;

        debug!("Created account {} ({})", account.id, account.name);
        Ok(())
    }

    /// Get an account by id.
    pub fn get_account(&self, id: &str) -> Option<Account> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, name, equity_balance, derivatives_balance, created_at, updated_at
             FROM accounts WHERE id = ?1",
            params![id],
            read_account,
        );

        match result {
            Ok(account) => Some(account),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching account {}: {}", id, e);
                None
            }
        }
    }

    // ========== Holding Methods ==========

    /// Insert a holding, or replace the position held for the same account,
    /// symbol and product.
    pub fn upsert_holding(&self, holding: &Holding) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO holdings (id, account_id, symbol, quantity, avg_price, product, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(account_id, symbol, product) DO UPDATE SET
                quantity = excluded.quantity,
                avg_price = excluded.avg_price,
                updated_at = excluded.updated_at",
            params![
                holding.id,
                holding.account_id,
                holding.symbol,
                holding.quantity,
                holding.avg_price,
                holding.product.as_str(),
                holding.created_at,
                holding.updated_at,
            ],
        )?;

        debug!(
            "Upserted holding {} {} x{}",
            holding.account_id, holding.symbol, holding.quantity
        );
        Ok(())
    }

    /// Get a holding by id.
    pub fn get_holding(&self, id: &str) -> Option<Holding> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, account_id, symbol, quantity, avg_price, product, created_at, updated_at
             FROM holdings WHERE id = ?1",
            params![id],
            read_holding,
        );

        match result {
            Ok(holding) => Some(holding),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error fetching holding {}: {}", id, e);
                None
            }
        }
    }

    /// List an account's holdings, optionally restricted to one product.
    pub fn holdings_for_account(
        &self,
        account_id: &str,
        product: Option<ProductType>,
    ) -> Result<Vec<Holding>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let holdings = match product {
            Some(product) => {
                let mut stmt = conn.prepare(
                    "SELECT id, account_id, symbol, quantity, avg_price, product, created_at, updated_at
                     FROM holdings WHERE account_id = ?1 AND product = ?2
                     ORDER BY symbol",
                )?;
                let rows = stmt.query_map(params![account_id, product.as_str()], read_holding)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, account_id, symbol, quantity, avg_price, product, created_at, updated_at
                     FROM holdings WHERE account_id = ?1
                     ORDER BY symbol",
                )?;
                let rows = stmt.query_map(params![account_id], read_holding)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(holdings)
    }

    /// List every holding of one product across all accounts.
    pub fn holdings_by_product(&self, product: ProductType) -> Result<Vec<Holding>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, account_id, symbol, quantity, avg_price, product, created_at, updated_at
             FROM holdings WHERE product = ?1
             ORDER BY account_id, symbol",
        )?;
        let rows = stmt.query_map(params![product.as_str()], read_holding)?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ========== Order & Trade Methods ==========

    /// List an account's most recent orders.
    pub fn orders_for_account(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<Order>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, account_id, symbol, side, order_type, product, quantity, status,
                    fill_price, filled_at, created_at
             FROM orders WHERE account_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![account_id, limit as i64], read_order)?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// List an account's most recent trades.
    pub fn trades_for_account(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<Trade>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, order_id, account_id, symbol, side, quantity, price, total, executed_at
             FROM trades WHERE account_id = ?1
             ORDER BY executed_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![account_id, limit as i64], read_trade)?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Get total order count.
    pub fn order_count(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
            .unwrap_or(0)
    }

    /// Get total trade count.
    pub fn trade_count(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))
            .unwrap_or(0)
    }

    // ========== Settlement ==========

    /// Close out one intraday holding at the given exit price.
    ///
    /// Appends the closing market order and its trade, credits the realized
    /// amount to the account's equity balance and deletes the holding, all in
    /// a single transaction. Returns `Ok(None)` when the holding no longer
    /// exists, which a caller should treat as "already settled".
    pub fn settle_intraday_holding(
        &self,
        holding_id: &str,
        exit_price: f64,
    ) -> Result<Option<SettlementRecord>, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        // Re-read under the transaction so a holding settled by a concurrent
        // batch shows up as already gone.
        let holding = match holding_in_tx(&tx, holding_id)? {
            Some(holding) => holding,
            None => return Ok(None),
        };

        if holding.product != ProductType::Intraday {
            return Err(StoreError::NotIntraday(holding.symbol));
        }

        let pnl = pnl::closeout_holding(&holding, exit_price);
        let order = Order::filled_market(
            &holding.account_id,
            &holding.symbol,
            holding.closing_side(),
            holding.product,
            holding.abs_quantity(),
            exit_price,
        );
        let trade = Trade::execution_of(&order, exit_price);

        insert_order(&tx, &order)?;
        insert_trade(&tx, &trade)?;

        let updated = tx.execute(
            "UPDATE accounts SET equity_balance = equity_balance + ?1, updated_at = ?2
             WHERE id = ?3",
            params![
                pnl.balance_delta,
                chrono::Utc::now().timestamp_millis(),
                holding.account_id,
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::AccountNotFound(holding.account_id));
        }

        tx.execute("DELETE FROM holdings WHERE id = ?1", params![holding.id])?;
        tx.commit()?;

        debug!(
            "Settled {} {} x{} at {} (pnl {:+})",
            holding.account_id, holding.symbol, holding.quantity, exit_price, pnl.realized_pnl
        );

        Ok(Some(SettlementRecord {
            holding_id: holding.id,
            account_id: holding.account_id,
            symbol: holding.symbol,
            order,
            trade,
            realized_pnl: pnl.realized_pnl,
            balance_delta: pnl.balance_delta,
        }))
    }
}

fn holding_in_tx(tx: &Transaction<'_>, id: &str) -> Result<Option<Holding>, rusqlite::Error> {
    let result = tx.query_row(
        "SELECT id, account_id, symbol, quantity, avg_price, product, created_at, updated_at
         FROM holdings WHERE id = ?1",
        params![id],
        read_holding,
    );

    match result {
        Ok(holding) => Ok(Some(holding)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn insert_order(tx: &Transaction<'_>, order: &Order) -> Result<(), rusqlite::Error> {
    tx.execute(
        "INSERT INTO orders (id, account_id, symbol, side, order_type, product, quantity, status,
                             fill_price, filled_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            order.id,
            order.account_id,
            order.symbol,
            order.side.as_str(),
            order.order_type.as_str(),
            order.product.as_str(),
            order.quantity,
            order.status.as_str(),
            order.fill_price,
            order.filled_at,
            order.created_at,
        ],
    )?;
    Ok(())
}

fn insert_trade(tx: &Transaction<'_>, trade: &Trade) -> Result<(), rusqlite::Error> {
    tx.execute(
        "INSERT INTO trades (id, order_id, account_id, symbol, side, quantity, price, total, executed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            trade.id,
            trade.order_id,
            trade.account_id,
            trade.symbol,
            trade.side.as_str(),
            trade.quantity,
            trade.price,
            trade.total,
            trade.executed_at,
        ],
    )?;
    Ok(())
}

fn read_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        equity_balance: row.get(2)?,
        derivatives_balance: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn read_holding(row: &rusqlite::Row<'_>) -> rusqlite::Result<Holding> {
    Ok(Holding {
        id: row.get(0)?,
        account_id: row.get(1)?,
        symbol: row.get(2)?,
        quantity: row.get(3)?,
        avg_price: row.get(4)?,
        product: column_enum(5, row.get(5)?)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn read_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        account_id: row.get(1)?,
        symbol: row.get(2)?,
        side: column_enum(3, row.get(3)?)?,
        order_type: column_enum(4, row.get(4)?)?,
        product: column_enum(5, row.get(5)?)?,
        quantity: row.get(6)?,
        status: column_enum(7, row.get(7)?)?,
        fill_price: row.get(8)?,
        filled_at: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn read_trade(row: &rusqlite::Row<'_>) -> rusqlite::Result<Trade> {
    Ok(Trade {
        id: row.get(0)?,
        order_id: row.get(1)?,
        account_id: row.get(2)?,
        symbol: row.get(3)?,
        side: column_enum(4, row.get(4)?)?,
        quantity: row.get(5)?,
        price: row.get(6)?,
        total: row.get(7)?,
        executed_at: row.get(8)?,
    })
}

/// Map a stored enum string back to its type, surfacing bad values as a
/// column conversion error instead of a panic.
fn column_enum<T>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
