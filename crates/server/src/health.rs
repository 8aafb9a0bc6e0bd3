use api_types::health::Health;
use axum::{Json, extract::State, http::StatusCode};

use crate::server::ServerState;

/// Probe the record store with a one-row read.
pub async fn get(State(state): State<ServerState>) -> (StatusCode, Json<Health>) {
    match state.engine.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Health {
                status: "ok".to_string(),
                store: "connected".to_string(),
                message: None,
            }),
        ),
        Err(err) => {
            tracing::error!("record store unreachable: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Health {
                    status: "error".to_string(),
                    store: "disconnected".to_string(),
                    message: Some(err.to_string()),
                }),
            )
        }
    }
}
