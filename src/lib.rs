//! # Flexcheck - Declarative Payload Validation
//!
//! Flexcheck validates dynamic objects (typically request payloads) against a
//! declarative spec of per-attribute rules and reports every violation.
//!
//! ## Features
//!
//! - **Declarative specs**: Load rules from JSON or TOML, or build them in code
//! - **Complete reports**: Every attribute and every rule is checked; nothing short-circuits
//! - **Typed rules**: `min`, `max`, `pattern` and `required` as a closed enum
//! - **Stable messages**: Violation texts follow fixed templates
//! - **Batch validation**: Validate many objects against one spec on the rayon pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flexcheck::prelude::*;
//!
//! let spec = Value::from_json(r#"{ "age": { "min": 18 } }"#)?;
//! let object = Value::from_json(r#"{ "age": 17 }"#)?;
//!
//! let report = do_validation(&spec, &object)?;
//! assert_eq!(report.messages(), vec!["age must be greater than or equal to 18"]);
//! ```
//!
//! Specs can also be built in code:
//!
//! ```rust,ignore
//! use flexcheck::prelude::*;
//!
//! let spec = ValidationSpec::new()
//!     .attribute("name", RuleSet::new().required())
//!     .attribute("code", RuleSet::new().pattern(["^[A-Z]{3}$"]));
//!
//! let report = Validator::new().validate(&spec, &object)?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Values, rules, errors, reports and configuration
//! - [`validation`]: Spec loading, rule evaluation and orchestration
//!
//! ## Semantics worth knowing
//!
//! - `min`/`max` pass when the attribute is missing or null. Declare
//!   `required` to enforce presence.
//! - `pattern` fails for a missing attribute, once per pattern. An empty
//!   pattern list always passes.
//! - A pattern that does not compile never matches; it is reported as a
//!   violation, not an error.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use flexcheck::prelude::*;
/// ```
pub mod prelude {
    // Values
    pub use crate::core::types::{Value, ValueMap};

    // Rules
    pub use crate::core::rule::{Pattern, Rule, RuleKind, RuleSet};

    // Errors and reports
    pub use crate::core::error::{
        FlexcheckError, FlexcheckResult, LegacyMessage, LegacyViolation, ValidationReport,
        Violation,
    };

    // Configuration
    pub use crate::core::config::{EngineConfig, UnknownRulePolicy};

    // Validation
    pub use crate::validation::evaluator::evaluate;
    pub use crate::validation::pipeline::{do_validation, Validator};
    pub use crate::validation::spec::{SpecLoader, ValidationSpec};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "flexcheck");
    }

    #[test]
    fn test_required_and_pattern_scenario() {
        let spec = Value::from_json(
            r#"{ "name": { "required": true }, "code": { "pattern": ["^[A-Z]{3}$"] } }"#,
        )
        .unwrap();
        let object = Value::from_json(r#"{ "code": "ab" }"#).unwrap();

        let report = do_validation(&spec, &object).unwrap();
        assert_eq!(
            report.messages(),
            vec!["name is required", "code must match regex of ^[A-Z]{3}$"]
        );
    }

    #[test]
    fn test_built_spec_validates() {
        let spec = ValidationSpec::new()
            .attribute("age", RuleSet::new().required().min(18.0).max(130.0));
        let object = Value::from_json(r#"{ "age": 42 }"#).unwrap();

        let report = Validator::new().validate(&spec, &object).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.summary(), "✓ Object satisfies every declared rule");
    }
}
