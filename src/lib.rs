//! Stockpit: a virtual stock-trading simulator with an intraday settlement
//! engine.
//!
//! The service keeps simulated accounts, open holdings and trade history in
//! SQLite, caches market quotes in memory, and squares off intraday positions
//! on demand or at market close. Each close-out runs in its own database
//! transaction so a partial batch can never corrupt an account.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::{AuthService, QuoteCache, SettlementEngine, SqliteStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SqliteStore>,
    pub quotes: Arc<QuoteCache>,
    pub auth: AuthService,
    pub settlement: Arc<SettlementEngine>,
}

pub use types::*;
