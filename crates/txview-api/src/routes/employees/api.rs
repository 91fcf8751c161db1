//! Employees API endpoints - JSON API

use axum::{extract::State, Json};
use txview_core::EmployeeOption;

use crate::AppState;

/// Filter options, "All Employees" first. Empty until the directory loads.
pub async fn api_employees(State(state): State<AppState>) -> Json<Vec<EmployeeOption>> {
    Json(state.coordinator.employee_options())
}

#[cfg(test)]
mod tests {
    use crate::testing::{app, body_json};
    use axum::{body::Body, http::Request};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_employee_options() {
        let (app, _) = app().await;
        let response = app
            .oneshot(Request::builder().uri("/api/employees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let options = body_json(response).await;
        assert_eq!(
            options,
            json!([
                { "value": "", "label": "All Employees" },
                { "value": "e1", "label": "Ada Lovelace" },
                { "value": "e2", "label": "Alan Turing" }
            ])
        );
    }
}
