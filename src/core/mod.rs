//! Core types for the flexcheck validation engine.
//!
//! This module contains the foundational types the engine is built from:
//! - Dynamic values for target objects
//! - Typed rules and rule sets
//! - Error and report types
//! - Engine configuration

pub mod types;
pub mod rule;
pub mod error;
pub mod config;

// Re-export commonly used types
pub use types::{Value, ValueMap};
pub use rule::{Pattern, Rule, RuleKind, RuleSet};
pub use error::{FlexcheckError, FlexcheckResult, LegacyViolation, ValidationReport, Violation};
pub use config::{EngineConfig, UnknownRulePolicy};
