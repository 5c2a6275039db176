//! Error and report types for flexcheck.
//!
//! Two categories are kept apart:
//! - [`FlexcheckError`]: caller mistakes (bad arguments, malformed specs,
//!   unreadable files). Returned through `Result`.
//! - [`Violation`]: a declared rule that does not hold for a value. This is
//!   ordinary data collected into a [`ValidationReport`].

use crate::core::rule::RuleKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for flexcheck.
#[derive(Error, Debug)]
pub enum FlexcheckError {
    #[error("do_validation requires two map arguments, got {spec} and {object}")]
    InvalidArguments {
        spec: &'static str,
        object: &'static str,
    },

    #[error("Invalid spec for attribute '{attr}': {reason}")]
    InvalidSpec { attr: String, reason: String },

    #[error("Unknown rule kind '{kind}' on attribute '{attr}'")]
    UnknownRule { attr: String, kind: String },

    #[error("Invalid operand for rule '{kind}' on attribute '{attr}': {reason}")]
    InvalidExpected {
        attr: String,
        kind: RuleKind,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FlexcheckError {
    /// Attribute the error refers to, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            FlexcheckError::InvalidSpec { attr, .. }
            | FlexcheckError::UnknownRule { attr, .. }
            | FlexcheckError::InvalidExpected { attr, .. } => Some(attr),
            _ => None,
        }
    }
}

/// Result type alias for flexcheck operations.
pub type FlexcheckResult<T> = Result<T, FlexcheckError>;

// ============================================================================
// Violations
// ============================================================================

/// One failed rule on one attribute.
///
/// Every violation carries at least one message. `min`, `max` and
/// `required` produce exactly one; `pattern` produces one per failing
/// pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Attribute the rule was declared on.
    pub attr: String,
    /// Kind of the failed rule.
    pub rule: RuleKind,
    /// Human-readable failure messages, in pattern order for `pattern`.
    pub messages: Vec<String>,
}

impl Violation {
    /// Create a violation with a single message.
    pub fn single(attr: impl Into<String>, rule: RuleKind, message: String) -> Self {
        Self {
            attr: attr.into(),
            rule,
            messages: vec![message],
        }
    }

    /// Message in the original asymmetric shape: a list for `pattern`, a
    /// single string for every other rule.
    pub fn legacy_message(&self) -> LegacyMessage {
        match self.rule {
            RuleKind::Pattern => LegacyMessage::Many(self.messages.clone()),
            _ => LegacyMessage::Single(self.messages.join("; ")),
        }
    }

    /// Convert to the original `{attr, valid, msg}` shape.
    pub fn to_legacy(&self) -> LegacyViolation {
        LegacyViolation {
            attr: self.attr.clone(),
            valid: false,
            msg: self.legacy_message(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

/// Message payload of a [`LegacyViolation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyMessage {
    /// Scalar rules
    Single(String),
    /// Pattern rules
    Many(Vec<String>),
}

/// Violation in the shape consumers of the original payload expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyViolation {
    /// Attribute name
    pub attr: String,
    /// Always false
    pub valid: bool,
    /// Failure message(s)
    pub msg: LegacyMessage,
}

// ============================================================================
// Validation Report
// ============================================================================

/// Ordered violations from one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Violations in spec order: attribute order, then rule order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Create a new empty report (success).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a violation to the report.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// True when no rule failed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when the report holds no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations for one attribute.
    pub fn for_attribute<'a>(&'a self, attr: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.attr == attr)
    }

    /// All messages, flattened in order.
    pub fn messages(&self) -> Vec<&str> {
        self.violations
            .iter()
            .flat_map(|v| v.messages.iter().map(String::as_str))
            .collect()
    }

    /// The report in the original payload shape.
    pub fn to_legacy(&self) -> Vec<LegacyViolation> {
        self.violations.iter().map(Violation::to_legacy).collect()
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_valid() {
            "✓ Object satisfies every declared rule".to_string()
        } else {
            format!("✗ Validation failed with {} violation(s)", self.violations.len())
        }
    }

    /// Get detailed, numbered messages.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .enumerate()
            .map(|(i, msg)| format!("{}. {}", i + 1, msg))
            .collect()
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}
