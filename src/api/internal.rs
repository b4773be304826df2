//! Internal API
//!
//! Provisioning surface for the platform, guarded by the shared internal key:
//! - POST /api/internal/accounts - Provision a trading account
//! - POST /api/internal/sessions - Mint a session for an account
//! - POST /api/internal/holdings - Write a position into the book
//!
//! These endpoints are how trading state enters this service. End users never
//! call them directly.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::api::auth::InternalAuth;
use crate::api::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::AuthError;
use crate::types::{Account, Holding, ProductType, Session};
use crate::AppState;

/// Create internal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/sessions", post(create_session))
        .route("/holdings", post(upsert_holding))
}

/// Request to provision an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
}

/// Request to mint a session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub account_id: String,
}

/// Request to write a position.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertHoldingRequest {
    pub account_id: String,
    pub symbol: String,
    /// Signed quantity: negative for a short position.
    pub quantity: f64,
    pub avg_price: f64,
    pub product: ProductType,
}

/// POST /api/internal/accounts
///
/// Provision a trading account with the configured starting balances.
async fn create_account(
    _auth: InternalAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<ApiResponse<Account>>> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Account name is required".to_string()));
    }

    let account = Account::new(
        name,
        state.config.trading.starting_equity_balance,
        state.config.trading.starting_derivatives_balance,
    );
    state.store.create_account(&account)?;
    info!("Provisioned account {} ({})", account.id, account.name);

    Ok(Json(ApiResponse { data: account }))
}

/// POST /api/internal/sessions
///
/// Mint a session for an account the platform has already authenticated.
async fn create_session(
    _auth: InternalAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> std::result::Result<Json<ApiResponse<Session>>, AuthError> {
    let session = state.auth.issue_session(&request.account_id)?;
    Ok(Json(ApiResponse { data: session }))
}

/// POST /api/internal/holdings
///
/// Write a position into the book, replacing any existing position for the
/// same account, symbol and product.
async fn upsert_holding(
    _auth: InternalAuth,
    State(state): State<AppState>,
    Json(request): Json<UpsertHoldingRequest>,
) -> Result<Json<ApiResponse<Holding>>> {
    if request.symbol.trim().is_empty() {
        return Err(AppError::BadRequest("Symbol is required".to_string()));
    }
    if !request.quantity.is_finite() || request.quantity == 0.0 {
        return Err(AppError::BadRequest(
            "Quantity must be a non-zero number".to_string(),
        ));
    }
    if !request.avg_price.is_finite() || request.avg_price <= 0.0 {
        return Err(AppError::BadRequest(
            "Average price must be positive".to_string(),
        ));
    }
    if state.store.get_account(&request.account_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Account {} not found",
            request.account_id
        )));
    }

    let holding = Holding::new(
        &request.account_id,
        &request.symbol,
        request.quantity,
        request.avg_price,
        request.product,
    );
    state.store.upsert_holding(&holding)?;

    Ok(Json(ApiResponse { data: holding }))
}
