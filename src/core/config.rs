//! Engine configuration.
//!
//! Loaded from TOML, e.g.:
//!
//! ```toml
//! unknown_rules = "reject"
//! parallel = true
//! log_level = "debug"
//! ```

use crate::core::error::{FlexcheckError, FlexcheckResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the spec loader does with declarations it cannot interpret: unknown
/// rule kinds, rule sets that are not maps, and malformed operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRulePolicy {
    /// Read them as loosely as payload producers would and keep loading:
    /// unknown kinds and non-map rule sets contribute no rules, bounds take
    /// their numeric reading (null reads as 0), and any operand yields
    /// pattern sources
    #[default]
    Ignore,
    /// Fail the load with [`FlexcheckError::UnknownRule`],
    /// [`FlexcheckError::InvalidSpec`] or [`FlexcheckError::InvalidExpected`]
    Reject,
}

/// Engine options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Handling of declarations the spec loader cannot interpret.
    pub unknown_rules: UnknownRulePolicy,
    /// Whether batch validation runs objects in parallel.
    pub parallel: bool,
    /// Default log filter for the binary (overridden by `RUST_LOG`).
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unknown_rules: UnknownRulePolicy::Ignore,
            parallel: true,
            log_level: "warn".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown-rule policy.
    pub fn with_unknown_rules(mut self, policy: UnknownRulePolicy) -> Self {
        self.unknown_rules = policy;
        self
    }

    /// Enable/disable parallel batch validation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the default log filter.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> FlexcheckResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> FlexcheckResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    fn check(&self) -> FlexcheckResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(FlexcheckError::Config("log_level must not be empty".to_string()));
        }
        Ok(())
    }
}
