//! Quotes API
//!
//! Market data in and out:
//! - PUT /api/quotes - Ingest a batch of quotes (internal)
//! - GET /api/quotes/:symbol - Latest usable quote for a symbol
//!
//! The platform's market data feed pushes batches here; settlement and
//! clients read the other side.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::auth::InternalAuth;
use crate::api::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::Quote;
use crate::AppState;

/// Create quotes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quotes", put(ingest_quotes))
        .route("/api/quotes/:symbol", get(get_quote))
}

/// One quote in an ingest batch.
#[derive(Debug, Deserialize)]
pub struct QuoteUpdate {
    pub symbol: String,
    pub price: f64,
}

/// Ingest outcome.
#[derive(Debug, Serialize)]
pub struct QuoteIngestResponse {
    pub accepted: usize,
    pub rejected: usize,
}

/// PUT /api/quotes
///
/// Ingest a batch of quotes from the market data feed. Unusable prices are
/// counted and dropped rather than failing the batch.
async fn ingest_quotes(
    _auth: InternalAuth,
    State(state): State<AppState>,
    Json(updates): Json<Vec<QuoteUpdate>>,
) -> Json<QuoteIngestResponse> {
    let mut accepted = 0;
    let mut rejected = 0;

    for update in &updates {
        if state.quotes.update(&update.symbol, update.price) {
            accepted += 1;
        } else {
            rejected += 1;
        }
    }
    state.quotes.purge_stale();

    debug!("Quote ingest: {} accepted, {} rejected", accepted, rejected);
    Json(QuoteIngestResponse { accepted, rejected })
}

/// GET /api/quotes/:symbol
///
/// Latest quote for a symbol, 404 when none is fresh enough to use.
async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Quote>>> {
    let quote = state.quotes.get_quote(&symbol).ok_or_else(|| {
        AppError::NotFound(format!("No usable quote for {}", symbol.to_uppercase()))
    })?;

    Ok(Json(ApiResponse { data: quote }))
}
