//! Router creation and configuration

use super::handlers::*;
use super::types::AppState;
use axum::{routing::get, Router};
use rulepack_repository::Registry;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Route serving single rules
pub const RULE_ROUTE: &str = "/r/*id";

/// Route serving packs
pub const PACK_ROUTE: &str = "/p/*name";

/// Create REST API router
pub fn create_router(registry: Arc<Registry>) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/health", get(health))
        .route(RULE_ROUTE, get(get_rule))
        .route(PACK_ROUTE, get(get_pack))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
