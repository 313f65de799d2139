//! Document models: rules, rule files and the pack manifest

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

use crate::RepositoryResult;

/// A single rule definition
///
/// Rules are opaque: apart from the mandatory string `id` every field is
/// passed through untouched, in the order it appeared in the source document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Rule(Mapping);

impl Rule {
    /// Field holding the rule identifier
    pub const ID_FIELD: &'static str = "id";

    /// The empty rule served for pack entries that do not resolve
    pub fn placeholder() -> Self {
        Self(Mapping::new())
    }

    /// Build a rule from a mapping, checking the `id` field
    pub fn from_mapping(fields: Mapping) -> Result<Self, String> {
        match fields.get(Self::ID_FIELD) {
            Some(Value::String(_)) => Ok(Self(fields)),
            Some(other) => Err(format!(
                "rule field `id` must be a string, found {}",
                value_kind(other)
            )),
            None => Err("rule is missing required field `id`".to_string()),
        }
    }

    /// Rule identifier; `None` only for the placeholder
    pub fn id(&self) -> Option<&str> {
        self.0.get(Self::ID_FIELD).and_then(Value::as_str)
    }

    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// All fields in document order
    pub fn fields(&self) -> &Mapping {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Mapping::deserialize(deserializer)?;
        Rule::from_mapping(fields).map_err(de::Error::custom)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// An on-disk rule document: `rules: [...]`
///
/// Documents without a `rules` key are valid and contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleFile {
    /// Parse a rule document
    ///
    /// A single rule without a string `id` fails the whole document.
    pub fn from_yaml(content: &str) -> RepositoryResult<Self> {
        parse_document(content)
    }
}

/// The pack manifest: `packs: {name: [rule-id, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackManifest {
    #[serde(default)]
    pub packs: BTreeMap<String, Vec<String>>,
}

impl PackManifest {
    pub fn from_yaml(content: &str) -> RepositoryResult<Self> {
        parse_document(content)
    }
}

/// Only the first document of a multi-document stream is read. Empty and
/// comment-only content parses to the type's default.
fn parse_document<T>(content: &str) -> RepositoryResult<T>
where
    T: Default + de::DeserializeOwned,
{
    let Some(document) = serde_yaml::Deserializer::from_str(content).next() else {
        return Ok(T::default());
    };
    let value = Value::deserialize(document)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Response document wrapping borrowed rules: `rules: [...]`
#[derive(Debug, Serialize)]
pub struct RuleDocument<'a> {
    pub rules: Vec<&'a Rule>,
}

impl<'a> RuleDocument<'a> {
    pub fn new(rules: Vec<&'a Rule>) -> Self {
        Self { rules }
    }

    pub fn single(rule: &'a Rule) -> Self {
        Self { rules: vec![rule] }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> RepositoryResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_file_preserves_field_order() {
        let file = RuleFile::from_yaml(
            r#"
rules:
  - id: sql-injection
    severity: high
    message: user input reaches a query
    tags: [web, db]
"#,
        )
        .unwrap();

        assert_eq!(file.rules.len(), 1);
        let rule = &file.rules[0];
        assert_eq!(rule.id(), Some("sql-injection"));
        assert_eq!(rule.get("severity").and_then(Value::as_str), Some("high"));

        let keys: Vec<&str> = rule.fields().keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["id", "severity", "message", "tags"]);
    }

    #[test]
    fn test_missing_id_fails_document() {
        let err = RuleFile::from_yaml(
            r#"
rules:
  - id: ok-rule
  - severity: high
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("missing required field `id`"));
    }

    #[test]
    fn test_non_string_id_fails_document() {
        let err = RuleFile::from_yaml("rules:\n  - id: 42\n").unwrap_err();
        assert!(err.to_string().contains("must be a string, found a number"));
    }

    #[test]
    fn test_document_without_rules_key_is_empty() {
        let file = RuleFile::from_yaml("packs:\n  web: [a, b]\n").unwrap();
        assert!(file.rules.is_empty());
    }

    #[test]
    fn test_empty_document_is_empty() {
        assert!(RuleFile::from_yaml("").unwrap().rules.is_empty());
        assert!(RuleFile::from_yaml("# nothing here\n").unwrap().rules.is_empty());
        assert!(PackManifest::from_yaml("").unwrap().packs.is_empty());
    }

    #[test]
    fn test_only_first_document_is_read() {
        let file = RuleFile::from_yaml("rules:\n  - id: first\n---\n").unwrap();
        let ids: Vec<&str> = file.rules.iter().filter_map(Rule::id).collect();
        assert_eq!(ids, vec!["first"]);

        let file = RuleFile::from_yaml("---\nrules:\n  - id: a\n---\nrules:\n  - id: b\n").unwrap();
        let ids: Vec<&str> = file.rules.iter().filter_map(Rule::id).collect();
        assert_eq!(ids, vec!["a"]);

        let manifest = PackManifest::from_yaml("packs:\n  web: [a]\n---\n").unwrap();
        assert_eq!(manifest.packs["web"], vec!["a".to_string()]);
    }

    #[test]
    fn test_parse_pack_manifest_keeps_order() {
        let manifest = PackManifest::from_yaml(
            r#"
packs:
  web: [xss, sql-injection, xss]
  infra:
    - open-port
"#,
        )
        .unwrap();

        assert_eq!(manifest.packs.len(), 2);
        assert_eq!(
            manifest.packs["web"],
            vec!["xss".to_string(), "sql-injection".to_string(), "xss".to_string()]
        );
    }

    #[test]
    fn test_malformed_manifest_is_error() {
        assert!(PackManifest::from_yaml("packs: [not, a, mapping]").is_err());
    }

    #[test]
    fn test_rule_document_yaml_output() {
        let file = RuleFile::from_yaml("rules:\n  - id: sql-injection\n    severity: high\n").unwrap();
        let placeholder = Rule::placeholder();
        let doc = RuleDocument::new(vec![&file.rules[0], &placeholder]);

        let yaml = doc.to_yaml().unwrap();
        assert_eq!(
            yaml,
            "rules:\n- id: sql-injection\n  severity: high\n- {}\n"
        );
    }

    #[test]
    fn test_placeholder() {
        let placeholder = Rule::placeholder();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.id(), None);
    }

    #[test]
    fn test_from_mapping() {
        let mut fields = Mapping::new();
        fields.insert(Value::from("id"), Value::from("xss"));
        let rule = Rule::from_mapping(fields).unwrap();
        assert_eq!(rule.id(), Some("xss"));

        assert!(Rule::from_mapping(Mapping::new()).is_err());
    }
}
