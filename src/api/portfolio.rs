//! Portfolio API
//!
//! Read endpoints for the authenticated account:
//! - GET /api/holdings - List open holdings (optional ?product= filter)
//! - GET /api/orders - List recent orders (?limit=)
//! - GET /api/trades - List recent trades (?limit=)
//! - GET /api/funds - Current cash balances

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::auth::Authenticated;
use crate::api::ApiResponse;
use crate::error::Result;
use crate::types::{Holding, Order, ProductType, Trade};
use crate::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = 500;

/// Create portfolio router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/holdings", get(list_holdings))
        .route("/orders", get(list_orders))
        .route("/trades", get(list_trades))
        .route("/funds", get(get_funds))
}

/// Query params for the holdings listing.
#[derive(Debug, Deserialize)]
pub struct ListHoldingsQuery {
    /// Restrict the listing to one product type.
    pub product: Option<ProductType>,
}

/// Query params for order and trade history listings.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

impl HistoryQuery {
    fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT)
    }
}

/// GET /api/holdings
///
/// List the authenticated account's open holdings.
async fn list_holdings(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<ListHoldingsQuery>,
) -> Result<Json<ApiResponse<Vec<Holding>>>> {
    let holdings = state
        .store
        .holdings_for_account(&auth.account.id, query.product)?;
    Ok(Json(ApiResponse { data: holdings }))
}

/// GET /api/orders
///
/// List the authenticated account's most recent orders.
async fn list_orders(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let orders = state
        .store
        .orders_for_account(&auth.account.id, query.effective_limit())?;
    Ok(Json(ApiResponse { data: orders }))
}

/// GET /api/trades
///
/// List the authenticated account's most recent trades.
async fn list_trades(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Trade>>>> {
    let trades = state
        .store
        .trades_for_account(&auth.account.id, query.effective_limit())?;
    Ok(Json(ApiResponse { data: trades }))
}

/// GET /api/funds
///
/// Current cash balances for the authenticated account.
async fn get_funds(auth: Authenticated) -> Json<ApiResponse<FundsResponse>> {
    Json(ApiResponse {
        data: FundsResponse {
            account_id: auth.account.id,
            equity_balance: auth.account.equity_balance,
            derivatives_balance: auth.account.derivatives_balance,
        },
    })
}

/// Cash balances per segment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsResponse {
    pub account_id: String,
    pub equity_balance: f64,
    pub derivatives_balance: f64,
}
