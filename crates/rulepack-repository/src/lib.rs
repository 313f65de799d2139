//! Rule repository and registry for the rulepack server
//!
//! This crate loads declarative rule documents and the pack manifest from
//! disk and folds them into an immutable [`Registry`] that the HTTP layer
//! reads from.
//!
//! # Quick Start
//!
//! ```no_run
//! use rulepack_repository::{RepositoryConfig, RepositoryLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RepositoryConfig::new("./patterns/")
//!         .with_packs_path("./patterns/packs.yml");
//!
//!     let registry = RepositoryLoader::new(config).load_all().await?;
//!
//!     if let Some(rule) = registry.get_rule("sql-injection") {
//!         println!("severity: {:?}", rule.get("severity"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │        rulepack-server (HTTP)          │
//! └──────────────┬─────────────────────────┘
//!                │ Arc<Registry>
//!                ↓
//! ┌────────────────────────────────────────┐
//! │  RepositoryLoader                      │
//! │  - last-wins rule insertion            │
//! │  - fatal manifest errors               │
//! │  - pack integrity logging              │
//! └──────────────┬─────────────────────────┘
//!                │ Repository trait
//!                ↓
//! ┌────────────────────────────────────────┐
//! │  FileSystemRepository                  │
//! │  - recursive *.yml walk (sorted)       │
//! │  - rule documents + pack manifest      │
//! └────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod file_system;
pub mod loader;
pub mod models;
pub mod registry;
pub mod traits;

// Re-exports - Configuration
pub use config::{ConfigError, RepositoryConfig};

// Re-exports - Error
pub use error::{RepositoryError, RepositoryResult};

// Re-exports - Loading
pub use file_system::FileSystemRepository;
pub use loader::RepositoryLoader;
pub use traits::Repository;

// Re-exports - Data
pub use models::{PackManifest, Rule, RuleDocument, RuleFile};
pub use registry::{MissingReference, Registry};
