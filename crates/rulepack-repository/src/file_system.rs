//! File system based repository implementation

use async_trait::async_trait;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::{
    config::RepositoryConfig,
    error::RepositoryError,
    models::{PackManifest, Rule, RuleFile},
    traits::Repository,
    RepositoryResult,
};

/// File system based repository
///
/// Rule documents are discovered by walking `rules_dir` recursively, or
/// `rules_dir` itself when it names a single document. The pack manifest is
/// read from `packs_path`.
pub struct FileSystemRepository {
    /// Absolute root of the rules tree
    root_path: PathBuf,
    config: RepositoryConfig,
}

impl FileSystemRepository {
    /// Create a new file system repository
    ///
    /// The rules directory does not have to exist yet; listing a missing
    /// root reports [`RepositoryError::InvalidPath`].
    ///
    /// # Example
    /// ```no_run
    /// use rulepack_repository::{FileSystemRepository, RepositoryConfig};
    ///
    /// let repo = FileSystemRepository::new(RepositoryConfig::new("patterns")).unwrap();
    /// ```
    pub fn new(config: RepositoryConfig) -> RepositoryResult<Self> {
        config
            .validate()
            .map_err(|e| RepositoryError::Config(e.to_string()))?;

        let root_path = config
            .rules_dir
            .absolutize()
            .map_err(|e| RepositoryError::Config(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        Ok(Self { root_path, config })
    }

    /// Absolute root of the rules tree
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Recursively collect rule documents, visiting entries in sorted order
    fn collect_documents<'a>(
        &'a self,
        dir: &'a Path,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = RepositoryResult<()>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut entries = fs::read_dir(dir).await?;
            let mut paths = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                paths.push(entry.path());
            }
            paths.sort();

            for path in paths {
                // Symlinked directories are not followed; symlinked files are read.
                let metadata = match fs::symlink_metadata(&path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        continue;
                    }
                };

                if metadata.is_dir() {
                    if let Err(e) = self.collect_documents(&path, files).await {
                        warn!("Skipping directory {}: {}", path.display(), e);
                    }
                } else if self.config.matches_extension(&path) {
                    files.push(path);
                }
            }

            Ok(())
        })
    }
}

#[async_trait]
impl Repository for FileSystemRepository {
    async fn list_rule_documents(&self) -> RepositoryResult<Vec<PathBuf>> {
        let metadata = fs::metadata(&self.root_path)
            .await
            .map_err(|_| RepositoryError::InvalidPath {
                path: self.root_path.clone(),
            })?;

        let mut files = Vec::new();
        if metadata.is_dir() {
            self.collect_documents(&self.root_path, &mut files).await?;
        } else if self.config.matches_extension(&self.root_path) {
            // A single rule document given as the root
            files.push(self.root_path.clone());
        }

        debug!(
            "Found {} rule documents under {}",
            files.len(),
            self.root_path.display()
        );

        Ok(files)
    }

    async fn load_rule_document(&self, path: &Path) -> RepositoryResult<Vec<Rule>> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RepositoryError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                RepositoryError::Io(e)
            }
        })?;

        Ok(RuleFile::from_yaml(&content)?.rules)
    }

    async fn load_pack_manifest(&self) -> RepositoryResult<Option<PackManifest>> {
        let Some(path) = &self.config.packs_path else {
            return Ok(None);
        };

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::Manifest {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let manifest = PackManifest::from_yaml(&content).map_err(|e| RepositoryError::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Some(manifest))
    }
}
