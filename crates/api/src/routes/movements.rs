//! Cash movement routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use vola_core::movement::{MovementError, MovementInput, MovementService, MovementType};
use vola_db::entities::movements;
use vola_db::repositories::{MovementRepoError, MovementRepository};
use vola_shared::types::{Currency, PageRequest};

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements))
        .route("/movements", post(create_movement))
        .route("/movements/{id}", put(update_movement))
        .route("/movements/{id}", delete(delete_movement))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// Request body for creating a movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// Movement type: "entry" or "exit".
    #[serde(rename = "type")]
    pub movement_type: String,
    /// Currency code.
    pub currency: String,
    /// Amount in `currency` (decimal string, positive).
    pub amount: String,
    /// Optional exchange rate override into MGA.
    pub exchange_rate: Option<String>,
    /// Description.
    pub description: String,
    /// Movement date.
    pub date: DateTime<Utc>,
    /// Display name of the recording user.
    pub author: String,
    /// The user accountable for the movement.
    pub responsible: String,
}

/// Request body for updating a movement.
#[derive(Debug, Deserialize)]
pub struct UpdateMovementRequest {
    /// Movement type: "entry" or "exit".
    #[serde(rename = "type")]
    pub movement_type: String,
    /// Currency code.
    pub currency: String,
    /// Amount in `currency` (decimal string, positive).
    pub amount: String,
    /// Optional exchange rate override into MGA.
    pub exchange_rate: Option<String>,
    /// Description.
    pub description: String,
    /// Movement date.
    pub date: DateTime<Utc>,
    /// The user accountable for the movement.
    pub responsible: String,
}

/// Response for a movement.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Movement ID.
    pub id: Uuid,
    /// Movement type.
    #[serde(rename = "type")]
    pub movement_type: String,
    /// Currency code.
    pub currency: String,
    /// Amount in `currency`.
    pub amount: String,
    /// The exchange rate that was applied.
    pub exchange_rate: String,
    /// The amount normalized into MGA.
    pub amount_mga: String,
    /// Description.
    pub description: String,
    /// Movement date.
    pub date: String,
    /// Display name of the recording user.
    pub author: String,
    /// The user accountable for the movement.
    pub responsible: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<movements::Model> for MovementResponse {
    fn from(m: movements::Model) -> Self {
        Self {
            id: m.id,
            movement_type: m.movement_type,
            currency: m.currency,
            amount: m.amount.to_string(),
            exchange_rate: m.exchange_rate.to_string(),
            amount_mga: m.amount_mga.to_string(),
            description: m.description,
            date: m.date.to_rfc3339(),
            author: m.author,
            responsible: m.responsible,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/movements` - List movements with pagination.
async fn list_movements(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListMovementsQuery>,
) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.limit.unwrap_or(10),
    };

    match repo.list(&page).await {
        Ok((rows, total)) => {
            let items: Vec<MovementResponse> =
                rows.into_iter().map(MovementResponse::from).collect();

            (
                StatusCode::OK,
                Json(json!({ "movements": items, "total_movements": total })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list movements");
            internal_error()
        }
    }
}

/// POST `/movements` - Record a new movement.
async fn create_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    let input = match parse_movement_input(
        &payload.movement_type,
        &payload.currency,
        &payload.amount,
        payload.exchange_rate.as_deref(),
        payload.description,
        payload.date,
        payload.author,
        payload.responsible,
    ) {
        Ok(input) => input,
        Err(response) => return response,
    };

    // Always recompute amount_mga server-side
    let resolved = match MovementService::resolve(&input, &state.rates) {
        Ok(resolved) => resolved,
        Err(e) => return movement_error(&e),
    };

    let repo = MovementRepository::new((*state.db).clone());
    match repo.create(auth.user_id(), &resolved).await {
        Ok(model) => {
            info!(movement_id = %model.id, user_id = %auth.user_id(), "Movement recorded");
            (StatusCode::CREATED, Json(MovementResponse::from(model))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create movement");
            internal_error()
        }
    }
}

/// PUT `/movements/{id}` - Edit a movement in place.
async fn update_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovementRequest>,
) -> impl IntoResponse {
    let input = match parse_movement_input(
        &payload.movement_type,
        &payload.currency,
        &payload.amount,
        payload.exchange_rate.as_deref(),
        payload.description,
        payload.date,
        auth.name().to_string(),
        payload.responsible,
    ) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let resolved = match MovementService::resolve(&input, &state.rates) {
        Ok(resolved) => resolved,
        Err(e) => return movement_error(&e),
    };

    let repo = MovementRepository::new((*state.db).clone());
    match repo.update(id, auth.user_id(), &resolved).await {
        Ok(model) => {
            info!(movement_id = %id, "Movement updated");
            (StatusCode::OK, Json(MovementResponse::from(model))).into_response()
        }
        Err(MovementRepoError::NotFound(_)) => movement_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update movement");
            internal_error()
        }
    }
}

/// DELETE `/movements/{id}` - Delete a movement.
async fn delete_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());

    match repo.delete(id, auth.user_id()).await {
        Ok(()) => {
            info!(movement_id = %id, "Movement deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(MovementRepoError::NotFound(_)) => movement_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete movement");
            internal_error()
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn parse_movement_input(
    movement_type: &str,
    currency: &str,
    amount: &str,
    exchange_rate: Option<&str>,
    description: String,
    date: DateTime<Utc>,
    author: String,
    responsible: String,
) -> Result<MovementInput, axum::response::Response> {
    let Ok(movement_type) = MovementType::from_str(movement_type) else {
        return Err(bad_request(
            "invalid_movement_type",
            "Movement type must be 'entry' or 'exit'",
        ));
    };

    let Ok(currency) = Currency::from_str(currency) else {
        return Err(bad_request("invalid_currency", "Unknown currency code"));
    };

    let Ok(amount) = Decimal::from_str(amount) else {
        return Err(bad_request("invalid_amount", "Invalid amount format"));
    };

    let exchange_rate = match exchange_rate {
        Some(raw) => match Decimal::from_str(raw) {
            Ok(rate) => Some(rate),
            Err(_) => {
                return Err(bad_request(
                    "invalid_exchange_rate",
                    "Invalid exchange rate format",
                ));
            }
        },
        None => None,
    };

    Ok(MovementInput {
        movement_type,
        currency,
        amount,
        exchange_rate,
        description,
        date,
        author,
        responsible,
    })
}

fn movement_error(e: &MovementError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": e.error_code(), "message": e.to_string() })),
    )
        .into_response()
}

fn movement_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Movement not found"
        })),
    )
        .into_response()
}

fn bad_request(error: &str, message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
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
