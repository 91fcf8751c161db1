//! Transactions API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_load_more: Append the next page (JSON)
//! - api_set_approved: Record an approval decision (JSON)
//! - htmx_transactions_list: Transaction board (HTML fragment)
//! - htmx_transactions_filter: Switch employee filter (HTML fragment)
//! - htmx_transactions_more: Load more (HTML fragment)
//! - htmx_transaction_approve: Toggle approval (HTML fragment)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Html,
    Form, Json,
};
use serde::Deserialize;
use txview_core::{ResolvedTransaction, TransactionId, ViewCoordinator, ViewSnapshot};

use super::page::{render_board, render_row};
use crate::error::ApiResult;
use crate::routes::view::{apply_filter, FilterRequest};
use crate::AppState;

/// Body of `PUT /api/transactions/:id/approved`
#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub value: bool,
}

/// Checkbox form; an unchecked box submits no `value`
#[derive(Debug, Deserialize)]
pub struct ApprovalForm {
    pub value: Option<String>,
}

/// Record an approval decision. Any id is accepted, including ones not on
/// the current board; the decision applies whenever that row is shown.
fn approve(
    coordinator: &ViewCoordinator,
    id: &TransactionId,
    approved: bool,
) -> Option<Vec<ResolvedTransaction>> {
    log::info!("Transaction {} approved: {}", id, approved);
    coordinator.set_approved(id.clone(), approved);
    coordinator.resolved_transactions()
}

async fn load_more(coordinator: &ViewCoordinator) {
    match coordinator.load_more().await {
        Ok(outcome) => log::debug!("Load more: {:?}", outcome),
        Err(e) => log::warn!("Load more failed: {}", e),
    }
}

/// Append the next page and return the resulting view (JSON API)
pub async fn api_load_more(State(state): State<AppState>) -> Json<ViewSnapshot> {
    load_more(&state.coordinator).await;
    Json(state.coordinator.snapshot())
}

/// Record a local approval decision and return the resolved board (JSON API)
pub async fn api_set_approved(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<ApprovalRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<ResolvedTransaction>>> {
    let Json(request) = request?;
    let resolved = approve(&state.coordinator, &TransactionId::new(id), request.value);
    Ok(Json(resolved.unwrap_or_default()))
}

/// HTMX: Transaction board - Partial page update
pub async fn htmx_transactions_list(State(state): State<AppState>) -> Html<String> {
    Html(render_board(&state.coordinator.snapshot()))
}

/// HTMX: Employee filter changed
pub async fn htmx_transactions_filter(
    State(state): State<AppState>,
    Form(form): Form<FilterRequest>,
) -> Html<String> {
    apply_filter(&state.coordinator, &form.employee_id).await;
    Html(render_board(&state.coordinator.snapshot()))
}

/// HTMX: "View More" pressed
pub async fn htmx_transactions_more(State(state): State<AppState>) -> Html<String> {
    load_more(&state.coordinator).await;
    Html(render_board(&state.coordinator.snapshot()))
}

/// HTMX: Approval checkbox toggled. Re-renders the row, or returns an empty
/// fragment when the row has left the board in the meantime.
pub async fn htmx_transaction_approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ApprovalForm>,
) -> Html<String> {
    let id = TransactionId::new(id);
    let resolved = approve(&state.coordinator, &id, form.value.is_some());
    let row = resolved
        .unwrap_or_default()
        .iter()
        .find(|t| t.transaction.id == id)
        .map(render_row)
        .unwrap_or_default();
    Html(row)
}
