//! Rule evaluation.
//!
//! Checks one rule against one attribute's actual value. `None` stands for
//! an attribute missing from the target object.

use crate::core::error::Violation;
use crate::core::rule::{Rule, RuleKind};
use crate::core::types::{format_number, Value};

/// Evaluate `rule` for attribute `attr` with its actual value.
///
/// Never fails for bad data: an unmatchable or uncompilable pattern is a
/// violation like any other.
pub fn evaluate(rule: &Rule, attr: &str, actual: Option<&Value>) -> Result<(), Violation> {
    match rule {
        // Absence is not a range violation; use `required` for presence.
        Rule::Min(min) => match present(actual).and_then(Value::as_number) {
            Some(num) if num < *min => Err(Violation::single(
                attr,
                RuleKind::Min,
                format!("{} must be greater than or equal to {}", attr, format_number(*min)),
            )),
            _ => Ok(()),
        },

        Rule::Max(max) => match present(actual).and_then(Value::as_number) {
            Some(num) if num > *max => Err(Violation::single(
                attr,
                RuleKind::Max,
                format!("{} must be less than or equal to {}", attr, format_number(*max)),
            )),
            _ => Ok(()),
        },

        Rule::Pattern(patterns) => {
            let text = actual.map(Value::to_text);
            let messages: Vec<String> = patterns
                .iter()
                .filter(|pattern| match &text {
                    Some(text) => !pattern.is_match(text),
                    None => true,
                })
                .map(|pattern| format!("{} must match regex of {}", attr, pattern.source()))
                .collect();

            if messages.is_empty() {
                Ok(())
            } else {
                Err(Violation {
                    attr: attr.to_string(),
                    rule: RuleKind::Pattern,
                    messages,
                })
            }
        }

        Rule::Required => match present(actual) {
            Some(_) => Ok(()),
            None => Err(Violation::single(
                attr,
                RuleKind::Required,
                format!("{} is required", attr),
            )),
        },
    }
}

impl Rule {
    /// Evaluate this rule; see [`evaluate`].
    pub fn evaluate(&self, attr: &str, actual: Option<&Value>) -> Result<(), Violation> {
        evaluate(self, attr, actual)
    }
}

/// Treat explicit null like a missing value.
fn present(actual: Option<&Value>) -> Option<&Value> {
    actual.filter(|v| !v.is_null())
}
