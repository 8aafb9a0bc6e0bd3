//! Dashboard API endpoint

use api_types::envelope::ApiResponse;
use axum::{Json, extract::State};
use engine::Dashboard;

use crate::{ServerError, server::ServerState};

/// Analytics computed over every stored expense, relative to today.
pub async fn get(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Dashboard>>, ServerError> {
    let dashboard = state.engine.dashboard_today().await?;
    Ok(Json(ApiResponse::success(dashboard)))
}
