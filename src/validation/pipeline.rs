//! Validation orchestration.
//!
//! Walks every attribute of a spec and every rule of that attribute, and
//! collects all violations in encounter order. There is no short-circuiting.

use crate::core::config::EngineConfig;
use crate::core::error::{FlexcheckError, FlexcheckResult, ValidationReport};
use crate::core::types::{Value, ValueMap};
use crate::validation::evaluator::evaluate;
use crate::validation::spec::{SpecLoader, ValidationSpec};
use rayon::prelude::*;

/// Runs specs against target objects.
///
/// Holds only configuration, so one validator (and one spec) can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: EngineConfig,
}

impl Validator {
    /// Create a validator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A spec loader honoring this validator's unknown-rule policy.
    pub fn loader(&self) -> SpecLoader {
        SpecLoader::new().with_unknown_rules(self.config.unknown_rules)
    }

    /// Validate an object's fields against a typed spec.
    pub fn validate_map(&self, spec: &ValidationSpec, object: &ValueMap) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (attr, rules) in spec {
            let actual = object.get(attr);
            for rule in rules {
                log::trace!("evaluating {} on '{}'", rule.kind(), attr);
                if let Err(violation) = evaluate(rule, attr, actual) {
                    report.add_violation(violation);
                }
            }
        }

        log::debug!(
            "validated {} attribute(s): {} violation(s)",
            spec.len(),
            report.len()
        );
        report
    }

    /// Validate an object against a typed spec.
    ///
    /// Fails with [`FlexcheckError::InvalidArguments`] if `object` is not a
    /// map.
    pub fn validate(&self, spec: &ValidationSpec, object: &Value) -> FlexcheckResult<ValidationReport> {
        match object {
            Value::Map(map) => Ok(self.validate_map(spec, map)),
            other => Err(FlexcheckError::InvalidArguments {
                spec: "map",
                object: other.type_name(),
            }),
        }
    }

    /// Validate a spec document and an object, both as dynamic values.
    ///
    /// Both arguments must be maps; anything else is a caller error and no
    /// report is produced.
    pub fn do_validation(&self, spec: &Value, object: &Value) -> FlexcheckResult<ValidationReport> {
        if !matches!((spec, object), (Value::Map(_), Value::Map(_))) {
            return Err(FlexcheckError::InvalidArguments {
                spec: spec.type_name(),
                object: object.type_name(),
            });
        }
        let spec = self.loader().load(spec)?;
        self.validate(&spec, object)
    }

    /// Validate many objects against one spec.
    ///
    /// Reports come back in input order. Runs on the rayon pool when the
    /// configuration enables parallelism.
    pub fn validate_batch(
        &self,
        spec: &ValidationSpec,
        objects: &[Value],
    ) -> FlexcheckResult<Vec<ValidationReport>> {
        if self.config.parallel {
            objects
                .par_iter()
                .map(|object| self.validate(spec, object))
                .collect()
        } else {
            objects.iter().map(|object| self.validate(spec, object)).collect()
        }
    }
}

/// Validate with the default configuration; see [`Validator::do_validation`].
pub fn do_validation(spec: &Value, object: &Value) -> FlexcheckResult<ValidationReport> {
    Validator::new().do_validation(spec, object)
}
