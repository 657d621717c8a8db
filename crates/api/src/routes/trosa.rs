//! Trosa (debt) and payment routes.

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
use vola_core::trosa::TrosaStatus;
use vola_db::entities::trosa_payments;
use vola_db::repositories::{
    CreateTrosaInput, NewPaymentInput, TrosaFilter, TrosaRepoError, TrosaRepository,
    TrosaWithPayments, UpdateTrosaInput,
};
use vola_shared::types::PageRequest;

/// Creates the trosa routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trosa", get(list_trosa))
        .route("/trosa", post(create_trosa))
        .route("/trosa/debtors", get(list_debtors))
        .route("/trosa/{id}", put(update_trosa))
        .route("/trosa/{id}", delete(delete_trosa))
        .route("/trosa/{id}/payments", get(list_payments))
        .route("/trosa/{id}/payments", post(add_payment))
        .route("/trosa/{id}/payments/{payment_id}", delete(remove_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing trosa.
#[derive(Debug, Deserialize)]
pub struct ListTrosaQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Debtor name search fragment.
    pub q: Option<String>,
    /// Status filter: "active", "paid" or "all".
    pub status: Option<String>,
}

/// Query parameters for the debtor autocomplete.
#[derive(Debug, Deserialize)]
pub struct DebtorsQuery {
    /// Debtor name search fragment.
    pub q: Option<String>,
}

/// Request body for creating or editing a trosa.
#[derive(Debug, Deserialize)]
pub struct TrosaRequest {
    /// The named debtor.
    pub debtor_name: String,
    /// Optional free-text note.
    pub description: Option<String>,
    /// Total amount owed (decimal string, positive).
    pub montant_total: String,
}

/// Request body for adding a payment.
#[derive(Debug, Deserialize)]
pub struct AddPaymentRequest {
    /// Amount paid (decimal string, positive).
    pub montant: String,
    /// When the payment was made.
    pub date_paiement: DateTime<Utc>,
    /// Optional free-text note.
    pub description: Option<String>,
}

/// Response for a payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Amount paid.
    pub montant: String,
    /// When the payment was made.
    pub date_paiement: String,
    /// Optional free-text note.
    pub description: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<trosa_payments::Model> for PaymentResponse {
    fn from(p: trosa_payments::Model) -> Self {
        Self {
            id: p.id,
            montant: p.montant.to_string(),
            date_paiement: p.date_paiement.to_rfc3339(),
            description: p.description,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Response for a trosa with its recomputed aggregate.
#[derive(Debug, Serialize)]
pub struct TrosaResponse {
    /// Trosa ID.
    pub id: Uuid,
    /// The named debtor.
    pub debtor_name: String,
    /// Optional free-text note.
    pub description: Option<String>,
    /// Total amount owed.
    pub montant_total: String,
    /// Whether payments cover the total (recomputed, not the stored flag).
    pub is_paid: bool,
    /// Settlement timestamp, if fully paid.
    pub date_paiement: Option<String>,
    /// Sum of all payments.
    pub total_paid: String,
    /// Amount still owed.
    pub remaining_amount: String,
    /// Payments, newest first.
    pub payments: Vec<PaymentResponse>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<TrosaWithPayments> for TrosaResponse {
    fn from(t: TrosaWithPayments) -> Self {
        Self {
            id: t.trosa.id,
            debtor_name: t.trosa.debtor_name,
            description: t.trosa.description,
            montant_total: t.trosa.montant_total.to_string(),
            is_paid: t.aggregate.is_paid,
            date_paiement: t.trosa.date_paiement.map(|d| d.to_rfc3339()),
            total_paid: t.aggregate.total_paid.to_string(),
            remaining_amount: t.aggregate.remaining_amount.to_string(),
            payments: t.payments.into_iter().map(PaymentResponse::from).collect(),
            created_at: t.trosa.created_at.to_rfc3339(),
            updated_at: t.trosa.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/trosa` - List trosa with payments and recomputed aggregates.
async fn list_trosa(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListTrosaQuery>,
) -> impl IntoResponse {
    let status = match parse_status(query.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };

    let filter = TrosaFilter {
        q: query.q,
        status,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.limit.unwrap_or(10),
    };

    let repo = TrosaRepository::new((*state.db).clone());
    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let items: Vec<TrosaResponse> = rows.into_iter().map(TrosaResponse::from).collect();

            (
                StatusCode::OK,
                Json(json!({ "trosa": items, "total_trosa": total })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list trosa");
            internal_error()
        }
    }
}

/// POST `/trosa` - Create a new trosa.
async fn create_trosa(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TrosaRequest>,
) -> impl IntoResponse {
    let (debtor_name, montant_total) = match parse_trosa_request(&payload) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let repo = TrosaRepository::new((*state.db).clone());
    let input = CreateTrosaInput {
        user_id: auth.user_id(),
        debtor_name,
        description: payload.description,
        montant_total,
    };

    match repo.create(input).await {
        Ok(model) => {
            info!(trosa_id = %model.id, user_id = %auth.user_id(), "Trosa created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": model.id,
                    "debtor_name": model.debtor_name,
                    "montant_total": model.montant_total.to_string(),
                    "is_paid": model.is_paid,
                    "created_at": model.created_at.to_rfc3339()
                })),
            )
                .into_response()
        }
        Err(e) => trosa_error(&e, "Failed to create trosa"),
    }
}

/// PUT `/trosa/{id}` - Edit a trosa's details.
///
/// The new total is validated against the recorded payments: lowering it
/// below the paid sum is rejected.
async fn update_trosa(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TrosaRequest>,
) -> impl IntoResponse {
    let (debtor_name, montant_total) = match parse_trosa_request(&payload) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let repo = TrosaRepository::new((*state.db).clone());
    let input = UpdateTrosaInput {
        debtor_name,
        description: payload.description,
        montant_total,
    };

    match repo.update(id, auth.user_id(), input).await {
        Ok(model) => {
            info!(trosa_id = %id, "Trosa updated");
            (
                StatusCode::OK,
                Json(json!({
                    "id": model.id,
                    "debtor_name": model.debtor_name,
                    "montant_total": model.montant_total.to_string(),
                    "is_paid": model.is_paid,
                    "updated_at": model.updated_at.to_rfc3339()
                })),
            )
                .into_response()
        }
        Err(e) => trosa_error(&e, "Failed to update trosa"),
    }
}

/// DELETE `/trosa/{id}` - Delete a trosa and all of its payments.
async fn delete_trosa(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TrosaRepository::new((*state.db).clone());

    match repo.delete(id, auth.user_id()).await {
        Ok(()) => {
            info!(trosa_id = %id, "Trosa deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => trosa_error(&e, "Failed to delete trosa"),
    }
}

/// GET `/trosa/{id}/payments` - List a trosa's payments, newest first.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TrosaRepository::new((*state.db).clone());

    match repo.payments(id, auth.user_id()).await {
        Ok(rows) => {
            let items: Vec<PaymentResponse> =
                rows.into_iter().map(PaymentResponse::from).collect();
            (StatusCode::OK, Json(json!({ "payments": items }))).into_response()
        }
        Err(e) => trosa_error(&e, "Failed to list payments"),
    }
}

/// POST `/trosa/{id}/payments` - Apply a payment against a trosa.
async fn add_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddPaymentRequest>,
) -> impl IntoResponse {
    let Ok(montant) = Decimal::from_str(&payload.montant) else {
        return bad_request("invalid_amount", "Invalid amount format");
    };

    let repo = TrosaRepository::new((*state.db).clone());
    let input = NewPaymentInput {
        montant,
        date_paiement: payload.date_paiement,
        description: payload.description,
    };

    match repo.add_payment(id, auth.user_id(), input).await {
        Ok((payment, debt)) => {
            info!(
                trosa_id = %id,
                payment_id = %payment.id,
                is_paid = debt.is_paid,
                "Payment added"
            );

            let message = if debt.is_paid {
                "Payment added; trosa is now fully paid"
            } else {
                "Payment added"
            };

            (
                StatusCode::CREATED,
                Json(json!({
                    "payment": PaymentResponse::from(payment),
                    "is_paid": debt.is_paid,
                    "total_paid": debt.total_paid.to_string(),
                    "remaining_amount": debt.remaining_amount.to_string(),
                    "message": message
                })),
            )
                .into_response()
        }
        Err(e) => trosa_error(&e, "Failed to add payment"),
    }
}

/// DELETE `/trosa/{id}/payments/{payment_id}` - Remove a payment and
/// recompute the trosa's status.
async fn remove_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, payment_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = TrosaRepository::new((*state.db).clone());

    match repo.remove_payment(id, auth.user_id(), payment_id).await {
        Ok(debt) => {
            info!(trosa_id = %id, payment_id = %payment_id, "Payment removed");
            (
                StatusCode::OK,
                Json(json!({
                    "is_paid": debt.is_paid,
                    "total_paid": debt.total_paid.to_string(),
                    "remaining_amount": debt.remaining_amount.to_string(),
                    "message": "Payment removed"
                })),
            )
                .into_response()
        }
        Err(e) => trosa_error(&e, "Failed to remove payment"),
    }
}

/// GET `/trosa/debtors` - Distinct recent debtor names for autocomplete.
async fn list_debtors(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DebtorsQuery>,
) -> impl IntoResponse {
    let repo = TrosaRepository::new((*state.db).clone());

    match repo.debtors(auth.user_id(), query.q.as_deref()).await {
        Ok(names) => (StatusCode::OK, Json(json!({ "debtors": names }))).into_response(),
        Err(e) => trosa_error(&e, "Failed to list debtors"),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_trosa_request(
    payload: &TrosaRequest,
) -> Result<(String, Decimal), axum::response::Response> {
    let debtor_name = payload.debtor_name.trim();
    if debtor_name.is_empty() {
        return Err(bad_request(
            "missing_debtor_name",
            "Debtor name is required",
        ));
    }

    let Ok(montant_total) = Decimal::from_str(&payload.montant_total) else {
        return Err(bad_request("invalid_amount", "Invalid total amount format"));
    };

    Ok((debtor_name.to_string(), montant_total))
}

fn parse_status(
    status: Option<&str>,
) -> Result<Option<TrosaStatus>, axum::response::Response> {
    match status {
        None | Some("" | "all") => Ok(None),
        Some(raw) => TrosaStatus::from_str(raw).map(Some).map_err(|_| {
            bad_request("invalid_status", "Status must be 'active', 'paid' or 'all'")
        }),
    }
}

fn trosa_error(e: &TrosaRepoError, context: &str) -> axum::response::Response {
    match e {
        TrosaRepoError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Trosa not found"
            })),
        )
            .into_response(),
        TrosaRepoError::Domain(domain) => {
            let status = StatusCode::from_u16(domain.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({
                    "error": domain.error_code(),
                    "message": domain.to_string()
                })),
            )
                .into_response()
        }
        TrosaRepoError::Database(_) => {
            error!(error = %e, "{context}");
            internal_error()
        }
    }
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
