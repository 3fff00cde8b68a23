use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{Router, routing::get};

use super::handlers::contact;
use super::handlers::probes::{healthz, livez};
use super::state::AppState;
use crate::prelude::Result;

pub fn build_routes() -> Result<Router> {
    let state = AppState::new()?;
    Ok(routes_with_state(state))
}

pub fn routes_with_state(state: AppState) -> Router {
    Router::new()
        .route("/api/contact", post(contact::submit))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state)
}
