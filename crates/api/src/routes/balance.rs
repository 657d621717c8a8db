//! Aggregate balance routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{NaiveTime, Utc};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use vola_db::repositories::BalanceRepository;

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/balance", get(get_balance))
        .route("/daily-movements", get(get_daily_movements))
}

/// GET `/balance` - Overall cash position across all users.
///
/// RMB is reported in its own bucket at face value; everything else is
/// folded into the normalized MGA bucket.
async fn get_balance(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = BalanceRepository::new((*state.db).clone());

    match repo.cash_balance().await {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute balance");
            internal_error()
        }
    }
}

/// GET `/daily-movements` - Today's entry and exit totals per bucket.
async fn get_daily_movements(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = BalanceRepository::new((*state.db).clone());

    // Start of today, boundary inclusive
    let since = Utc::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();

    match repo.daily_totals(since).await {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute daily totals");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
