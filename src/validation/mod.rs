//! Validation module: spec loading, rule evaluation and orchestration.
//!
//! The orchestrator walks a spec and hands each rule to the evaluator;
//! every failure ends up in the returned report.

pub mod evaluator;
pub mod pipeline;
pub mod spec;

pub use evaluator::evaluate;
pub use pipeline::{do_validation, Validator};
pub use spec::{SpecLoader, ValidationSpec};
