//! Compiler configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{CompileError, CompileResult};

/// Default token separator in lookup keys.
pub const DEFAULT_SEPARATOR: &str = "__";

/// Settings for a [`Compiler`](crate::Compiler).
///
/// ```toml
/// separator = "__"
/// coerce_strings = true
/// disabled_operators = ["regex", "iregex"]
///
/// [operator_aliases]
/// like = "contains"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Separator between path tokens.
    pub separator: String,

    /// Extra operator tokens, mapped onto built-in operator tokens.
    pub operator_aliases: BTreeMap<String, String>,

    /// Operator tokens removed from the registry.
    pub disabled_operators: Vec<String>,

    /// Parse string values into the attribute's type before building predicates.
    pub coerce_strings: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            operator_aliases: BTreeMap::new(),
            disabled_operators: Vec::new(),
            coerce_strings: true,
        }
    }
}

impl CompilerConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> CompileResult<Self> {
        let config: CompilerConfig = toml::from_str(source)
            .map_err(|e| CompileError::config(format!("Failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> CompileResult<()> {
        if self.separator.is_empty() {
            return Err(CompileError::config("separator must not be empty"));
        }
        Ok(())
    }
}
