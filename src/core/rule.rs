//! Typed rules and rule sets.
//!
//! A [`RuleSet`] holds the rules declared for one attribute, at most one per
//! [`RuleKind`], in declaration order.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Numeric lower bound
    Min,
    /// Numeric upper bound
    Max,
    /// Ordered list of regular expressions
    Pattern,
    /// Presence check
    Required,
}

impl RuleKind {
    /// Every supported kind, in a stable order.
    pub const ALL: [RuleKind; 4] = [
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Pattern,
        RuleKind::Required,
    ];

    /// Look up a kind by its spec key.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "min" => Some(RuleKind::Min),
            "max" => Some(RuleKind::Max),
            "pattern" => Some(RuleKind::Pattern),
            "required" => Some(RuleKind::Required),
            _ => None,
        }
    }

    /// The spec key for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Pattern => "pattern",
            RuleKind::Required => "required",
        }
    }

    /// Get a human-readable description of this kind.
    pub fn description(&self) -> &'static str {
        match self {
            RuleKind::Min => "Numeric value must be >= the bound; missing values pass",
            RuleKind::Max => "Numeric value must be <= the bound; missing values pass",
            RuleKind::Pattern => "Value must be present and match every regex in the list",
            RuleKind::Required => "Value must be present and not null",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A regex source with its compiled form.
///
/// Compilation happens once, at construction. A source that does not
/// compile is kept with no compiled form and never matches.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Option<Regex>,
}

impl Pattern {
    /// Compile a pattern from its source.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::warn!("pattern '{}' does not compile and will never match: {}", source, e);
                None
            }
        };
        Self { source, compiled }
    }

    /// The regex source as declared.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the source compiled.
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Search `text` for a match. Uncompilable patterns never match.
    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.as_ref().is_some_and(|regex| regex.is_match(text))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// One declared rule: a kind together with its expected operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must be >= bound
    Min(f64),
    /// Value must be <= bound
    Max(f64),
    /// Value must match every pattern
    Pattern(Vec<Pattern>),
    /// Value must be present
    Required,
}

impl Rule {
    /// Build a pattern rule from regex sources.
    pub fn pattern<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Pattern(sources.into_iter().map(Pattern::new).collect())
    }

    /// Kind of this rule.
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Min(_) => RuleKind::Min,
            Rule::Max(_) => RuleKind::Max,
            Rule::Pattern(_) => RuleKind::Pattern,
            Rule::Required => RuleKind::Required,
        }
    }

    /// Get a human-readable description of this rule.
    pub fn description(&self) -> String {
        match self {
            Rule::Min(min) => format!("Must be at least {}", min),
            Rule::Max(max) => format!("Must be at most {}", max),
            Rule::Pattern(patterns) => {
                let sources: Vec<&str> = patterns.iter().map(Pattern::source).collect();
                format!("Must match: {:?}", sources)
            }
            Rule::Required => "Required".to_string(),
        }
    }
}

/// Rules declared for one attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule. A rule of the same kind is replaced in place.
    pub fn insert(&mut self, rule: Rule) {
        let kind = rule.kind();
        match self.rules.iter_mut().find(|r| r.kind() == kind) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Add a rule (builder form of [`RuleSet::insert`]).
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.insert(rule);
        self
    }

    /// Add a `min` rule.
    pub fn min(self, min: f64) -> Self {
        self.with_rule(Rule::Min(min))
    }

    /// Add a `max` rule.
    pub fn max(self, max: f64) -> Self {
        self.with_rule(Rule::Max(max))
    }

    /// Add a `pattern` rule.
    pub fn pattern<I, S>(self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_rule(Rule::pattern(sources))
    }

    /// Add a `required` rule.
    pub fn required(self) -> Self {
        self.with_rule(Rule::Required)
    }

    /// Get the rule of a given kind.
    pub fn get(&self, kind: RuleKind) -> Option<&Rule> {
        self.rules.iter().find(|r| r.kind() == kind)
    }

    /// Iterate rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        let mut set = RuleSet::new();
        for rule in iter {
            set.insert(rule);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        for kind in RuleKind::ALL {
            assert_eq!(RuleKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(RuleKind::from_name("between"), None);
        assert_eq!(RuleKind::from_name("Min"), None);
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&RuleKind::Pattern).unwrap();
        assert_eq!(json, "\"pattern\"");
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let pattern = Pattern::new("(unclosed");
        assert!(!pattern.is_compiled());
        assert!(!pattern.is_match("(unclosed"));
        assert_eq!(pattern.source(), "(unclosed");
    }

    #[test]
    fn test_pattern_is_unanchored_search() {
        let pattern = Pattern::new("b+");
        assert!(pattern.is_match("abbbc"));
        assert!(!pattern.is_match("ac"));
    }

    #[test]
    fn test_rule_set_replaces_same_kind() {
        let set = RuleSet::new().min(1.0).required().min(5.0);
        assert_eq!(set.len(), 2);
        let kinds: Vec<RuleKind> = set.iter().map(Rule::kind).collect();
        assert_eq!(kinds, vec![RuleKind::Min, RuleKind::Required]);
        assert_eq!(set.get(RuleKind::Min), Some(&Rule::Min(5.0)));
    }

    #[test]
    fn test_rule_description() {
        assert_eq!(Rule::Min(18.0).description(), "Must be at least 18");
        assert!(Rule::pattern(["^a$"]).description().contains("^a$"));
    }
}
