//! Quote Cache Service
//!
//! In-memory cache of the latest traded price per symbol, fed by the market
//! data ingest endpoint. Reads are staleness-checked so settlement never
//! closes a position against a price from a dead feed.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

/// A cached market quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Instrument symbol (uppercase)
    pub symbol: String,
    /// Last traded price
    pub price: f64,
    /// When the quote was ingested (ms)
    pub updated_at: i64,
}

/// Thread-safe cache of latest quotes with staleness tracking.
#[derive(Clone)]
pub struct QuoteCache {
    quotes: Arc<DashMap<String, Quote>>,
    stale_after_ms: i64,
}

impl QuoteCache {
    /// Create a cache that treats quotes older than `stale_after_ms` as unusable.
    pub fn new(stale_after_ms: i64) -> Self {
        Self {
            quotes: Arc::new(DashMap::new()),
            stale_after_ms,
        }
    }

    /// Ingest a quote. Returns false when the price is not a usable number.
    pub fn update(&self, symbol: &str, price: f64) -> bool {
        if !price.is_finite() || price <= 0.0 {
            debug!("Rejected quote for {}: price {}", symbol, price);
            return false;
        }

        let symbol = symbol.trim().to_uppercase();
        let quote = Quote {
            symbol: symbol.clone(),
            price,
            updated_at: chrono::Utc::now().timestamp_millis(),
        };
        self.quotes.insert(symbol, quote);
        true
    }

    /// Get the latest price for a symbol, if one is fresh enough to use.
    pub fn get_price(&self, symbol: &str) -> Option<f64> {
        self.get_quote(symbol).map(|q| q.price)
    }

    /// Get the full quote for a symbol, if one is fresh enough to use.
    pub fn get_quote(&self, symbol: &str) -> Option<Quote> {
        let symbol = symbol.trim().to_uppercase();
        let cutoff = chrono::Utc::now().timestamp_millis() - self.stale_after_ms;

        self.quotes
            .get(&symbol)
            .filter(|q| q.updated_at > cutoff)
            .map(|q| q.clone())
    }

    /// Drop quotes that have gone stale. Returns how many were removed.
    pub fn purge_stale(&self) -> usize {
        let cutoff = chrono::Utc::now().timestamp_millis() - self.stale_after_ms;
        let before = self.quotes.len();
        self.quotes.retain(|_, q| q.updated_at > cutoff);
        before - self.quotes.len()
    }

    /// Number of cached symbols, stale or not.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
