use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::{dashboard, expenses, health, receipts};
use engine::Engine;
use ocr::OcrClient;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// `None` when no OCR key is configured.
    pub ocr: Option<Arc<OcrClient>>,
}

impl ServerState {
    pub fn new(engine: Engine, ocr: Option<OcrClient>) -> Self {
        Self {
            engine: Arc::new(engine),
            ocr: ocr.map(Arc::new),
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(health::get))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .patch(expenses::update)
                .delete(expenses::delete),
        )
        .route("/dashboard", get(dashboard::get))
        .route("/ocr/extract", post(receipts::extract))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(state: ServerState, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await.inspect_err(|err| {
        tracing::error!("failed to bind server listener on {addr}: {err}");
    })?;
    run_with_listener(state, listener).await
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
