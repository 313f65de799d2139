//! REST API implementation
//!
//! - types: Response and state types
//! - extractors: Path key extraction
//! - handlers: API endpoint handlers
//! - router: Router creation and configuration
//! - tests: Unit tests for all components

mod extractors;
mod handlers;
mod router;
pub mod types;

// Re-export public API
pub use extractors::PathKey;
pub use router::{create_router, PACK_ROUTE, RULE_ROUTE};
pub use types::{AppState, HealthResponse, YamlDocument, YAML_CONTENT_TYPE};
