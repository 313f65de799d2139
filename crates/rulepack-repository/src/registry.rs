//! Immutable in-memory table of loaded rules and packs

use std::collections::{BTreeMap, HashMap};

use crate::models::Rule;

/// A pack entry that names a rule which was never loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    pub pack: String,
    pub rule_id: String,
}

/// Loaded rules keyed by id, and packs keyed by name
///
/// Built once at startup and only read afterwards, so it can be shared
/// between request handlers behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct Registry {
    rules: HashMap<String, Rule>,
    packs: BTreeMap<String, Vec<String>>,
    placeholder: Rule,
}

impl Registry {
    /// Build a registry from already-resolved rules and packs
    pub fn new(rules: HashMap<String, Rule>, packs: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            rules,
            packs,
            placeholder: Rule::placeholder(),
        }
    }

    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// Resolve a pack to its rules, in declared order
    ///
    /// Ids that do not resolve are returned as the empty placeholder rule
    /// rather than dropped.
    pub fn get_pack(&self, name: &str) -> Option<Vec<&Rule>> {
        let ids = self.packs.get(name)?;
        Some(
            ids.iter()
                .map(|id| self.rules.get(id).unwrap_or(&self.placeholder))
                .collect(),
        )
    }

    /// Declared rule ids of a pack
    pub fn pack_rule_ids(&self, name: &str) -> Option<&[String]> {
        self.packs.get(name).map(Vec::as_slice)
    }

    /// Every pack entry whose rule id is not loaded, by pack name then position
    pub fn missing_references(&self) -> Vec<MissingReference> {
        self.packs
            .iter()
            .flat_map(|(pack, ids)| {
                ids.iter()
                    .filter(|id| !self.rules.contains_key(id.as_str()))
                    .map(move |id| MissingReference {
                        pack: pack.clone(),
                        rule_id: id.clone(),
                    })
            })
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }
}
