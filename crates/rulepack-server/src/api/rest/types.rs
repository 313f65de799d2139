//! REST API type definitions

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rulepack_repository::Registry;
use serde::Serialize;
use std::sync::Arc;

/// Content type of rule documents
pub const YAML_CONTENT_TYPE: &str = "text/yaml";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rules: usize,
    pub packs: usize,
}

/// A rendered YAML body served as `text/yaml`
#[derive(Debug)]
pub struct YamlDocument(pub String);

impl IntoResponse for YamlDocument {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, YAML_CONTENT_TYPE)],
            self.0,
        )
            .into_response()
    }
}
