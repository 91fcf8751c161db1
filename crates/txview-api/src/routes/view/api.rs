//! View API endpoints - JSON API

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use txview_core::{EmployeeSelection, ViewCoordinator, ViewSnapshot};

use crate::error::ApiResult;
use crate::AppState;

/// Body of `POST /api/filter`; an empty id selects all employees
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default)]
    pub employee_id: String,
}

/// Current view snapshot (JSON API)
pub async fn api_view(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.coordinator.snapshot())
}

/// Switch the employee filter. Fetch failures are logged here and surface
/// through `transactionsStatus` in the next snapshot.
pub(crate) async fn apply_filter(coordinator: &ViewCoordinator, raw: &str) {
    if let Err(e) = coordinator.select(EmployeeSelection::from_raw(raw)).await {
        log::warn!("Filter change failed: {}", e);
    }
}

/// Switch the employee filter and return the resulting view (JSON API)
pub async fn api_filter(
    State(state): State<AppState>,
    request: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<Json<ViewSnapshot>> {
    let Json(request) = request?;
    apply_filter(&state.coordinator, &request.employee_id).await;
    Ok(Json(state.coordinator.snapshot()))
}
