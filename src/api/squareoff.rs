//! Square-Off API
//!
//! Force-closes intraday positions:
//! - POST /api/squareoff - Square off the caller's intraday positions
//! - POST /api/squareoff/run - Square off all intraday positions (internal)
//!
//! The first backs the panic button in the client; the second is hit by the
//! market-close scheduler with the shared internal key. Both report partial
//! failures in the response body instead of failing the whole request.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::Serialize;

use crate::api::auth::{Authenticated, InternalAuth};
use crate::api::ErrorResponse;
use crate::services::{SettlementError, StoreError};
use crate::AppState;

/// Create square-off router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/squareoff", post(square_off_positions))
        .route("/api/squareoff/run", post(run_scheduled_square_off))
}

/// POST /api/squareoff
///
/// Square off every intraday position of the authenticated account.
async fn square_off_positions(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<SquareOffResponse>, SettlementError> {
    let report = state.settlement.square_off_account(&auth.account.id)?;

    Ok(Json(SquareOffResponse {
        message: format!(
            "Squared off {} of {} intraday positions",
            report.squared_off, report.total
        ),
        squared_off: report.squared_off,
        total: report.total,
        errors: report.errors,
    }))
}

/// POST /api/squareoff/run
///
/// Square off every intraday position across all accounts. The scheduler
/// calls this at market close.
async fn run_scheduled_square_off(
    _auth: InternalAuth,
    State(state): State<AppState>,
) -> Result<Json<ScheduledSquareOffResponse>, SettlementError> {
    let report = state.settlement.square_off_all()?;

    Ok(Json(ScheduledSquareOffResponse {
        success: true,
        squared_off: report.squared_off,
        total: report.total,
        errors: report.errors,
    }))
}

// =============================================================================
// Response Types
// =============================================================================

/// Response for the user-triggered square-off.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareOffResponse {
    pub message: String,
    pub squared_off: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Response for the schedule-triggered square-off.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSquareOffResponse {
    pub success: bool,
    pub squared_off: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Convert SettlementError to HTTP response.
impl IntoResponse for SettlementError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            SettlementError::PriceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NO_PRICE_DATA")
            }
            SettlementError::Store(StoreError::AccountNotFound(_)) => {
                (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND")
            }
            SettlementError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
