//! Router construction for the domain-shop API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/check-domain", get(handlers::check_domain))
        .route("/domains/generate", post(handlers::generate_domains))
        .route("/domains/purchase", post(handlers::purchase_domain))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
