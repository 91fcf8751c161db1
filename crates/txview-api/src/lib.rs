//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::view: View snapshot and employee filter
//! - routes::employees: Filter options
//! - routes::transactions: Review page, load more, approvals
//! - routes::settings: Effective configuration

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use txview_config::Config;
use txview_core::ViewCoordinator;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ViewCoordinator>,
    pub config: Arc<Config>,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::employees::api_employees;
    use routes::transactions::{
        api_load_more, api_set_approved, htmx_transaction_approve, htmx_transactions_filter,
        htmx_transactions_list, htmx_transactions_more, page_index,
    };
    use routes::settings::api_settings;
    use routes::view::{api_filter, api_view};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/view", get(api_view))
        .route("/api/employees", get(api_employees))
        .route("/api/filter", post(api_filter))
        .route("/api/transactions/more", post(api_load_more))
        .route("/api/transactions/:id/approved", put(api_set_approved))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_index))
        // HTMX partial routes
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/filter", post(htmx_transactions_filter))
        .route("/transactions/more", post(htmx_transactions_more))
        .route("/transactions/:id/approve", post(htmx_transaction_approve))
        .fallback(error::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - txview</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Minimal escaping for text interpolated into HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Bind and serve until the listener fails
pub async fn start_server(config: Config, coordinator: Arc<ViewCoordinator>) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let state = AppState {
        coordinator,
        config: Arc::new(config),
    };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txview server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Transaction review)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}
