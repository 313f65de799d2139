//! Registry loader
//!
//! Applies the load policy on top of a [`Repository`]:
//!
//! - unreadable or unparseable rule documents are logged and skipped
//! - a rule id seen twice keeps the last document's definition
//! - an unreadable or unparseable pack manifest is fatal
//! - packs naming unknown rules are logged, never rejected

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::RepositoryConfig;
use crate::error::RepositoryResult;
use crate::file_system::FileSystemRepository;
use crate::models::Rule;
use crate::registry::Registry;
use crate::traits::Repository;

/// Builds the [`Registry`] from a repository
///
/// # Example
///
/// ```rust,ignore
/// use rulepack_repository::{RepositoryConfig, RepositoryLoader};
///
/// let config = RepositoryConfig::new("patterns").with_packs_path("patterns/packs.yml");
/// let registry = RepositoryLoader::new(config).load_all().await?;
/// ```
pub struct RepositoryLoader {
    config: RepositoryConfig,
}

impl RepositoryLoader {
    pub fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Load rules and packs from the configured file system location
    pub async fn load_all(&self) -> RepositoryResult<Registry> {
        let repo = FileSystemRepository::new(self.config.clone())?;
        Self::load_from(&repo).await
    }

    /// Load rules and packs from any repository
    pub async fn load_from(repo: &dyn Repository) -> RepositoryResult<Registry> {
        let rules = Self::load_rules(repo).await;
        info!("loaded {} rules", rules.len());

        let packs = match repo.load_pack_manifest().await? {
            Some(manifest) => manifest.packs,
            None => BTreeMap::new(),
        };
        info!("loaded {} packs", packs.len());

        let registry = Registry::new(rules, packs);

        for missing in registry.missing_references() {
            error!(
                "pack {:?} contained unknown rule {:?}",
                missing.pack, missing.rule_id
            );
        }

        Ok(registry)
    }

    async fn load_rules(repo: &dyn Repository) -> HashMap<String, Rule> {
        let mut rules = HashMap::new();
        let mut sources: HashMap<String, PathBuf> = HashMap::new();

        let documents = match repo.list_rule_documents().await {
            Ok(documents) => documents,
            Err(e) => {
                error!("error scanning rule documents: {}", e);
                return rules;
            }
        };

        for path in documents {
            let loaded = match repo.load_rule_document(&path).await {
                Ok(loaded) => loaded,
                Err(e) => {
                    error!("error loading {}: {}", path.display(), e);
                    continue;
                }
            };

            for rule in loaded {
                let Some(id) = rule.id().map(str::to_string) else {
                    continue;
                };

                if let Some(previous) = sources.insert(id.clone(), path.clone()) {
                    warn!(
                        "rule {:?} from {} replaces the definition from {}",
                        id,
                        path.display(),
                        previous.display()
                    );
                }
                rules.insert(id, rule);
            }
        }

        rules
    }
}
