//! Validation specs and their loading from dynamic values, JSON and TOML.
//!
//! A spec document maps attribute names to rule tables:
//!
//! ```json
//! {
//!   "age":  { "required": true, "min": 18, "max": 130 },
//!   "code": { "pattern": ["^[A-Z]{3}$"] }
//! }
//! ```

use crate::core::config::UnknownRulePolicy;
use crate::core::error::{FlexcheckError, FlexcheckResult};
use crate::core::rule::{Rule, RuleKind, RuleSet};
use crate::core::types::Value;
use indexmap::IndexMap;
use std::path::Path;

/// Insertion-ordered mapping of attribute name to its rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationSpec {
    attributes: IndexMap<String, RuleSet>,
}

impl ValidationSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the rules of an attribute, replacing any earlier declaration.
    pub fn insert(&mut self, attr: impl Into<String>, rules: RuleSet) {
        self.attributes.insert(attr.into(), rules);
    }

    /// Builder form of [`ValidationSpec::insert`].
    pub fn attribute(mut self, attr: impl Into<String>, rules: RuleSet) -> Self {
        self.insert(attr, rules);
        self
    }

    /// Rules for one attribute.
    pub fn get(&self, attr: &str) -> Option<&RuleSet> {
        self.attributes.get(attr)
    }

    /// Iterate attributes and their rules in declaration order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, RuleSet> {
        self.attributes.iter()
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when no attributes are declared.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Total number of rules across attributes.
    pub fn rule_count(&self) -> usize {
        self.attributes.values().map(RuleSet::len).sum()
    }

    /// Build a spec from a dynamic value with the default policy.
    pub fn from_value(value: &Value) -> FlexcheckResult<Self> {
        SpecLoader::new().load(value)
    }

    /// Parse a spec from JSON text with the default policy.
    pub fn from_json(json: &str) -> FlexcheckResult<Self> {
        SpecLoader::new().load_json(json)
    }

    /// Parse a spec from TOML text with the default policy.
    pub fn from_toml(text: &str) -> FlexcheckResult<Self> {
        SpecLoader::new().load_toml(text)
    }
}

impl<'a> IntoIterator for &'a ValidationSpec {
    type Item = (&'a String, &'a RuleSet);
    type IntoIter = indexmap::map::Iter<'a, String, RuleSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl FromIterator<(String, RuleSet)> for ValidationSpec {
    fn from_iter<T: IntoIterator<Item = (String, RuleSet)>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

/// Builds typed specs from spec documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecLoader {
    unknown_rules: UnknownRulePolicy,
}

impl SpecLoader {
    /// Create a lenient loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for declarations the loader cannot interpret.
    pub fn with_unknown_rules(mut self, policy: UnknownRulePolicy) -> Self {
        self.unknown_rules = policy;
        self
    }

    /// Parse JSON text and load it.
    pub fn load_json(&self, json: &str) -> FlexcheckResult<ValidationSpec> {
        let value: Value = serde_json::from_str(json)?;
        self.load(&value)
    }

    /// Parse TOML text and load it.
    pub fn load_toml(&self, text: &str) -> FlexcheckResult<ValidationSpec> {
        let value: Value = toml::from_str(text)?;
        self.load(&value)
    }

    /// Load a spec file; `.toml` files are read as TOML, anything else as JSON.
    pub fn load_file(&self, path: impl AsRef<Path>) -> FlexcheckResult<ValidationSpec> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.load_toml(&text),
            _ => self.load_json(&text),
        }
    }

    /// Load a spec from a dynamic value.
    pub fn load(&self, value: &Value) -> FlexcheckResult<ValidationSpec> {
        let map = value.as_map().ok_or_else(|| FlexcheckError::InvalidSpec {
            attr: String::new(),
            reason: format!("spec must be a map, got {}", value.type_name()),
        })?;

        let mut spec = ValidationSpec::new();
        for (attr, rules) in map {
            spec.insert(attr.clone(), self.load_rule_set(attr, rules)?);
        }

        log::debug!(
            "loaded spec with {} attribute(s), {} rule(s)",
            spec.len(),
            spec.rule_count()
        );
        Ok(spec)
    }

    fn load_rule_set(&self, attr: &str, value: &Value) -> FlexcheckResult<RuleSet> {
        let Some(table) = value.as_map() else {
            if self.is_strict() {
                return Err(FlexcheckError::InvalidSpec {
                    attr: attr.to_string(),
                    reason: format!("rules must be a map, got {}", value.type_name()),
                });
            }
            log::debug!("'{}' declares {} instead of a rule map; no rules apply", attr, value.type_name());
            return Ok(RuleSet::new());
        };

        let mut rules = RuleSet::new();
        for (name, expected) in table {
            let Some(kind) = RuleKind::from_name(name) else {
                if self.is_strict() {
                    return Err(FlexcheckError::UnknownRule {
                        attr: attr.to_string(),
                        kind: name.clone(),
                    });
                }
                log::debug!("ignoring unknown rule kind '{}' on '{}'", name, attr);
                continue;
            };
            if let Some(rule) = self.load_rule(attr, kind, expected)? {
                rules.insert(rule);
            }
        }
        Ok(rules)
    }

    /// Build one rule. `Ok(None)` means a lenient load dropped a rule that
    /// could never fail.
    fn load_rule(&self, attr: &str, kind: RuleKind, expected: &Value) -> FlexcheckResult<Option<Rule>> {
        let invalid = |reason: String| FlexcheckError::InvalidExpected {
            attr: attr.to_string(),
            kind,
            reason,
        };

        match kind {
            RuleKind::Min | RuleKind::Max => {
                let bound = match expected.as_float() {
                    Some(bound) => bound,
                    None if self.is_strict() => {
                        return Err(invalid(format!("expected a number, got {}", expected.type_name())));
                    }
                    // A null bound compares as 0.
                    None if expected.is_null() => 0.0,
                    None => match expected.as_number() {
                        Some(bound) => bound,
                        None => {
                            log::debug!("'{}' {} bound has no numeric reading; rule dropped", attr, kind);
                            return Ok(None);
                        }
                    },
                };
                Ok(Some(if kind == RuleKind::Min {
                    Rule::Min(bound)
                } else {
                    Rule::Max(bound)
                }))
            }
            RuleKind::Pattern => {
                if self.is_strict() {
                    let items = expected.as_array().ok_or_else(|| {
                        invalid(format!("expected an array of strings, got {}", expected.type_name()))
                    })?;
                    let sources = items
                        .iter()
                        .map(|item| {
                            item.as_string().ok_or_else(|| {
                                invalid(format!("pattern entries must be strings, got {}", item.type_name()))
                            })
                        })
                        .collect::<FlexcheckResult<Vec<&str>>>()?;
                    return Ok(Some(Rule::pattern(sources)));
                }
                Ok(Some(Rule::pattern(lenient_pattern_sources(expected))))
            }
            RuleKind::Required => {
                if expected.as_bool() == Some(false) {
                    log::warn!("'{}' declares required = false, which still enforces presence", attr);
                }
                Ok(Some(Rule::Required))
            }
        }
    }

    fn is_strict(&self) -> bool {
        self.unknown_rules == UnknownRulePolicy::Reject
    }
}

/// Pattern sources read from any operand: the entries of an array or the
/// values of a map (as text), the characters of a string, and nothing for
/// scalars.
fn lenient_pattern_sources(expected: &Value) -> Vec<String> {
    match expected {
        Value::Array(items) => items.iter().map(Value::to_text).collect(),
        Value::Map(map) => map.values().map(Value::to_text).collect(),
        Value::String(s) => s.chars().map(String::from).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_preserves_order() {
        let spec = ValidationSpec::from_json(
            r#"{
                "name": { "required": true, "pattern": ["^[a-z]+$"] },
                "age": { "max": 130, "min": 18 }
            }"#,
        )
        .unwrap();

        let attrs: Vec<&str> = spec.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(attrs, vec!["name", "age"]);

        let kinds: Vec<RuleKind> = spec.get("age").unwrap().iter().map(Rule::kind).collect();
        assert_eq!(kinds, vec![RuleKind::Max, RuleKind::Min]);
        assert_eq!(spec.rule_count(), 4);
    }

    #[test]
    fn test_unknown_kind_ignored_by_default() {
        let spec = ValidationSpec::from_json(r#"{ "age": { "between": [1, 2], "min": 1 } }"#).unwrap();
        assert_eq!(spec.get("age").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let loader = SpecLoader::new().with_unknown_rules(UnknownRulePolicy::Reject);
        let err = loader.load_json(r#"{ "age": { "between": [1, 2] } }"#).unwrap_err();
        match err {
            FlexcheckError::UnknownRule { attr, kind } => {
                assert_eq!(attr, "age");
                assert_eq!(kind, "between");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn strict() -> SpecLoader {
        SpecLoader::new().with_unknown_rules(UnknownRulePolicy::Reject)
    }

    #[test]
    fn test_invalid_operands_rejected_when_strict() {
        let err = strict().load_json(r#"{ "age": { "min": "18" } }"#).unwrap_err();
        assert!(matches!(err, FlexcheckError::InvalidExpected { kind: RuleKind::Min, .. }));

        let err = strict().load_json(r#"{ "age": { "max": null } }"#).unwrap_err();
        assert!(matches!(err, FlexcheckError::InvalidExpected { kind: RuleKind::Max, .. }));

        let err = strict().load_json(r#"{ "code": { "pattern": "^a$" } }"#).unwrap_err();
        assert!(matches!(err, FlexcheckError::InvalidExpected { kind: RuleKind::Pattern, .. }));

        let err = strict().load_json(r#"{ "code": { "pattern": ["^a$", 3] } }"#).unwrap_err();
        assert!(matches!(err, FlexcheckError::InvalidExpected { kind: RuleKind::Pattern, .. }));
    }

    #[test]
    fn test_lenient_bound_operands() {
        let spec = ValidationSpec::from_json(
            r#"{ "a": { "min": "18" }, "b": { "min": null }, "c": { "max": "abc" } }"#,
        )
        .unwrap();
        assert_eq!(spec.get("a").unwrap().get(RuleKind::Min), Some(&Rule::Min(18.0)));
        assert_eq!(spec.get("b").unwrap().get(RuleKind::Min), Some(&Rule::Min(0.0)));
        assert!(spec.get("c").unwrap().is_empty());
    }

    #[test]
    fn test_lenient_pattern_operands() {
        let spec = ValidationSpec::from_json(
            r#"{
                "a": { "pattern": ["^x", 3, null] },
                "b": { "pattern": { "first": "^y" } },
                "c": { "pattern": "ab" },
                "d": { "pattern": 7 }
            }"#,
        )
        .unwrap();
        assert_eq!(spec.get("a").unwrap().get(RuleKind::Pattern), Some(&Rule::pattern(["^x", "3", "null"])));
        assert_eq!(spec.get("b").unwrap().get(RuleKind::Pattern), Some(&Rule::pattern(["^y"])));
        assert_eq!(spec.get("c").unwrap().get(RuleKind::Pattern), Some(&Rule::pattern(["a", "b"])));
        assert_eq!(
            spec.get("d").unwrap().get(RuleKind::Pattern),
            Some(&Rule::Pattern(Vec::new()))
        );
    }

    #[test]
    fn test_non_map_documents() {
        let err = ValidationSpec::from_json("[]").unwrap_err();
        assert!(matches!(err, FlexcheckError::InvalidSpec { .. }));

        let err = strict().load_json(r#"{ "age": 18 }"#).unwrap_err();
        assert_eq!(err.attribute(), Some("age"));
    }

    #[test]
    fn test_non_map_rule_sets_are_empty_when_lenient() {
        let spec = ValidationSpec::from_json(r#"{ "age": null, "name": 18, "code": "abc" }"#).unwrap();
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.rule_count(), 0);
    }

    #[test]
    fn test_required_operand_is_ignored() {
        let spec = ValidationSpec::from_json(r#"{ "name": { "required": false } }"#).unwrap();
        assert_eq!(spec.get("name").unwrap().get(RuleKind::Required), Some(&Rule::Required));
    }

    #[test]
    fn test_load_toml() {
        let spec = ValidationSpec::from_toml(
            r#"
            [code]
            pattern = ["^[A-Z]{3}$"]
            required = true
            "#,
        )
        .unwrap();
        let rules = spec.get("code").unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.get(RuleKind::Pattern).is_some());
    }

    #[test]
    fn test_load_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "age": {{ "min": 18 }} }}"#).unwrap();

        let spec = SpecLoader::new().load_file(file.path()).unwrap();
        assert_eq!(spec.get("age").unwrap().get(RuleKind::Min), Some(&Rule::Min(18.0)));
    }

    #[test]
    fn test_builder_matches_loaded() {
        let built = ValidationSpec::new().attribute("age", RuleSet::new().min(18.0));
        let loaded = ValidationSpec::from_json(r#"{ "age": { "min": 18 } }"#).unwrap();
        assert_eq!(built, loaded);
    }
}
