//! API endpoint handlers

use super::extractors::PathKey;
use super::types::*;
use crate::error::ServerError;
use axum::{extract::State, Json};
use rulepack_repository::RuleDocument;
use tracing::info;

/// Health check endpoint
pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rules: state.registry.rule_count(),
        packs: state.registry.pack_count(),
    })
}

/// Single rule endpoint: `GET /r/{id}`
// TODO: render documents once at startup instead of per request
pub(super) async fn get_rule(
    State(state): State<AppState>,
    PathKey(id): PathKey,
) -> Result<YamlDocument, ServerError> {
    info!("rule {}", id);

    let rule = state
        .registry
        .get_rule(&id)
        .ok_or_else(|| ServerError::NotFound(format!("rule {:?}", id)))?;

    Ok(YamlDocument(RuleDocument::single(rule).to_yaml()?))
}

/// Pack endpoint: `GET /p/{name}`
pub(super) async fn get_pack(
    State(state): State<AppState>,
    PathKey(name): PathKey,
) -> Result<YamlDocument, ServerError> {
    info!("pack {}", name);

    let rules = state
        .registry
        .get_pack(&name)
        .ok_or_else(|| ServerError::NotFound(format!("pack {:?}", name)))?;

    Ok(YamlDocument(RuleDocument::new(rules).to_yaml()?))
}
