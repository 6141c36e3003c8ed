pub mod api;
pub mod fetch;
pub mod render;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use render::{font::FontHandle, RenderConfig};

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub font: FontHandle,
    pub render: RenderConfig,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(api::generate))
        .route("/health", get(api::health))
        .with_state(Arc::new(state))
}
