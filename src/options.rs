//! Rename options: strategy, exclusion rules, prefix and the output map callback

use crate::error::{RenameError, Result};
use crate::output_map::RenamingMap;
use crate::types::{DEBUG_SUFFIX, PREFIX_SEPARATOR};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transform applied to every non-excluded name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameStrategy {
    /// Identity; names only change when a prefix is configured
    #[default]
    None,
    /// Appends a trailing `_` so renamed identifiers stand out
    Debug,
}

impl RenameStrategy {
    pub fn apply(&self, name: &str) -> String {
        match self {
            RenameStrategy::None => name.to_string(),
            RenameStrategy::Debug => format!("{}{}", name, DEBUG_SUFFIX),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenameStrategy::None => "none",
            RenameStrategy::Debug => "debug",
        }
    }
}

impl FromStr for RenameStrategy {
    type Err = RenameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(RenameStrategy::None),
            "debug" => Ok(RenameStrategy::Debug),
            other => Err(RenameError::invalid_strategy(other)),
        }
    }
}

impl fmt::Display for RenameStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `except` entry. Always tested against the original name.
#[derive(Debug, Clone)]
pub enum ExclusionRule {
    Exact(String),
    Pattern(Regex),
}

impl ExclusionRule {
    pub fn exact(name: impl Into<String>) -> Self {
        ExclusionRule::Exact(name.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(ExclusionRule::Pattern)
            .map_err(|e| RenameError::invalid_pattern(pattern, e.to_string()))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            ExclusionRule::Exact(exact) => exact == name,
            ExclusionRule::Pattern(regex) => regex.is_match(name),
        }
    }
}

pub type OutputMapCallback = Box<dyn FnMut(&RenamingMap) + Send>;

/// Options for one renamer. Each run gets a fresh cache and map; the options
/// themselves are read-only apart from the callback.
#[derive(Default)]
pub struct RenameOptions {
    pub strategy: RenameStrategy,
    pub except: Vec<ExclusionRule>,
    pub prefix: Option<String>,
    pub output_map_callback: Option<OutputMapCallback>,
}

impl RenameOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: RenameStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_exclusion(mut self, rule: ExclusionRule) -> Self {
        self.except.push(rule);
        self
    }

    pub fn except_name(self, name: impl Into<String>) -> Self {
        self.with_exclusion(ExclusionRule::exact(name))
    }

    pub fn except_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.with_exclusion(ExclusionRule::pattern(pattern)?))
    }

    pub fn on_output_map<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&RenamingMap) + Send + 'static,
    {
        self.output_map_callback = Some(Box::new(callback));
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.except.iter().any(|rule| rule.matches(name))
    }

    /// Strategy first, then the optional `prefix-` in front
    pub fn decorate(&self, name: &str) -> String {
        let base = self.strategy.apply(name);
        match &self.prefix {
            Some(prefix) => format!("{}{}{}", prefix, PREFIX_SEPARATOR, base),
            None => base,
        }
    }
}

impl fmt::Debug for RenameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenameOptions")
            .field("strategy", &self.strategy)
            .field("except", &self.except)
            .field("prefix", &self.prefix)
            .field("output_map_callback", &self.output_map_callback.is_some())
            .finish()
    }
}

/// An `except` entry as written in a config file: a bare string is an exact
/// name, `{ "pattern": "..." }` is a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusionEntry {
    Name(String),
    Pattern { pattern: String },
}

impl ExclusionEntry {
    pub fn compile(&self) -> Result<ExclusionRule> {
        match self {
            ExclusionEntry::Name(name) => Ok(ExclusionRule::exact(name.clone())),
            ExclusionEntry::Pattern { pattern } => ExclusionRule::pattern(pattern),
        }
    }
}

/// Serializable form of [`RenameOptions`], as loaded from a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameConfig {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub except: Vec<ExclusionEntry>,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl RenameConfig {
    /// Validates the strategy and compiles every pattern. Fails before any
    /// stylesheet is touched.
    pub fn into_options(self) -> Result<RenameOptions> {
        let strategy = match self.strategy.as_deref() {
            Some(value) => value.parse()?,
            None => RenameStrategy::default(),
        };

        let except = self
            .except
            .iter()
            .map(ExclusionEntry::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(RenameOptions {
            strategy,
            except,
            prefix: self.prefix,
            output_map_callback: None,
        })
    }
}

impl TryFrom<RenameConfig> for RenameOptions {
    type Error = RenameError;

    fn try_from(config: RenameConfig) -> Result<Self> {
        config.into_options()
    }
}
