//! Core trait definition for rule repositories
//!
//! [`Repository`] is the read-only seam between the storage backend and
//! [`RepositoryLoader`](crate::RepositoryLoader). The loader owns policy
//! (which failures are fatal, duplicate handling, integrity logging); a
//! repository only finds, reads and parses documents.
//!
//! ```no_run
//! use rulepack_repository::{FileSystemRepository, Repository, RepositoryConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let repo = FileSystemRepository::new(RepositoryConfig::new("patterns"))?;
//!
//! for path in repo.list_rule_documents().await? {
//!     let rules = repo.load_rule_document(&path).await?;
//!     println!("{}: {} rules", path.display(), rules.len());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::models::{PackManifest, Rule};
use crate::RepositoryResult;

/// Read-only access to rule documents and the pack manifest
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
pub trait Repository: Send + Sync {
    /// List every rule document, in the order they should be applied
    ///
    /// Later documents win when two define the same rule id, so the order
    /// must be deterministic.
    async fn list_rule_documents(&self) -> RepositoryResult<Vec<PathBuf>>;

    /// Read and parse one rule document
    async fn load_rule_document(&self, path: &Path) -> RepositoryResult<Vec<Rule>>;

    /// Read and parse the pack manifest
    ///
    /// Returns `Ok(None)` when the repository has no manifest configured.
    async fn load_pack_manifest(&self) -> RepositoryResult<Option<PackManifest>>;
}
