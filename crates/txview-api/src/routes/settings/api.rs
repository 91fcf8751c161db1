//! Settings API endpoints - JSON API

use axum::{extract::State, Json};
use txview_config::Config;

use crate::AppState;

pub async fn api_settings(State(state): State<AppState>) -> Json<Config> {
    Json(state.config.as_ref().clone())
}
