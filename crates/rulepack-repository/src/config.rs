//! Repository configuration types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default rules directory
pub const DEFAULT_RULES_DIR: &str = "./patterns/";

/// Default pack manifest path
pub const DEFAULT_PACKS_PATH: &str = "./patterns/packs.yml";

/// Repository configuration
///
/// Specifies where rule documents and the pack manifest live.
///
/// # Examples
///
/// ```rust
/// use rulepack_repository::RepositoryConfig;
///
/// // Rules only, no pack manifest
/// let config = RepositoryConfig::new("patterns");
///
/// // Rules plus manifest, accepting both extensions
/// let config = RepositoryConfig::new("patterns")
///     .with_packs_path("patterns/packs.yml")
///     .with_extensions(["yml", "yaml"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Root directory scanned recursively for rule documents
    pub rules_dir: PathBuf,

    /// Pack manifest path; `None` means no packs are loaded
    pub packs_path: Option<PathBuf>,

    /// File extensions (without the dot) that mark a rule document
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["yml".to_string()]
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from(DEFAULT_RULES_DIR),
            packs_path: Some(PathBuf::from(DEFAULT_PACKS_PATH)),
            extensions: default_extensions(),
        }
    }
}

impl RepositoryConfig {
    /// Create a configuration for the given rules directory with no manifest
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            packs_path: None,
            extensions: default_extensions(),
        }
    }

    /// Set the pack manifest path
    ///
    /// An empty path disables pack loading, the same as never setting one.
    pub fn with_packs_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.packs_path = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path.to_path_buf())
        };
        self
    }

    /// Replace the accepted rule document extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Whether `path` has one of the accepted extensions
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "rules_dir".to_string(),
            });
        }

        if self.extensions.iter().all(|e| e.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "extensions".to_string(),
                message: "at least one non-empty extension is required".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required field is empty
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    /// A field has an unusable value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}
