//! CSS custom property renamer
//!
//! Renames custom property identifiers (`--name: ...` declarations and
//! `var(--name, ...)` references) across a stylesheet that has already been
//! parsed by an external CSS parser.
//!
//! # Features
//!
//! - `var()` discovery through nested defaults, nested functions and
//!   extraneous grouping parentheses
//! - Byte-exact rewriting: only identifier tokens change
//! - `none` and `debug` strategies, optional prefix, exact and regex exclusions
//! - Ordered original -> renamed map delivered once per run
//!
//! # Basic Usage
//!
//! ```rust
//! use cssvr::{Renamer, RenameOptions, RenameStrategy, Rule, Result};
//!
//! fn main() -> Result<()> {
//!     let options = RenameOptions::new()
//!         .with_strategy(RenameStrategy::Debug)
//!         .on_output_map(|map| println!("{} names renamed", map.len()));
//!
//!     let mut rules = vec![Rule::new(":root").with_declaration("--gap", "var(--base, 4px)")];
//!     Renamer::new(options).run(&mut rules);
//!     assert_eq!(rules[0].declarations[0].prop, "--gap_");
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! 1. **Walker** - visit every declaration of every rule in order
//! 2. **Scanner** - locate `var()` calls in each value
//! 3. **Resolver** - strategy, prefix and exclusions, memoized per run
//! 4. **Rewriter** - substitute identifier tokens, right to left
//! 5. **Output map** - first-discovery order, handed to the callback

pub mod types;
pub mod error;
pub mod options;
pub mod scanner;
pub mod resolver;
pub mod rewriter;
pub mod output_map;
pub mod walker;
pub mod cli;

use serde::Serialize;
use std::fs;

// Re-export commonly used types and functions
pub use error::{RenameError, Result};
pub use types::*;
pub use options::{
    ExclusionEntry, ExclusionRule, OutputMapCallback, RenameConfig, RenameOptions, RenameStrategy,
};
pub use scanner::{scan_value, ValueScan, ValueSpan};
pub use resolver::{NameResolver, Resolution};
pub use rewriter::{apply_replacements, rewrite_property_name, Replacement};
pub use output_map::{OutputMapBuilder, RenamingMap};
pub use walker::{DeclarationWalker, RenameStats};
pub use cli::EnhancedCli;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Runs the rename over externally owned rules.
///
/// Every call to [`Renamer::run`] starts with an empty rename cache and an
/// empty output map, so one renamer can process several stylesheets without
/// leaking names between them.
#[derive(Debug)]
pub struct Renamer {
    options: RenameOptions,
}

impl Renamer {
    pub fn new(options: RenameOptions) -> Self {
        Self { options }
    }

    /// Builds options from a config, failing before any stylesheet is touched
    pub fn from_config(config: RenameConfig) -> Result<Self> {
        Ok(Self::new(config.into_options()?))
    }

    /// Rename in place, deliver the map to the callback once, return counters
    pub fn run<R: RuleNode>(&mut self, rules: &mut [R]) -> RenameStats {
        log::debug!("Rename options: {:?}", self.options);

        let (map, stats) = {
            let mut walker = DeclarationWalker::new(NameResolver::new(&self.options));
            walker.walk_rules(rules);
            walker.finish()
        };

        log::info!(
            "Visited {} declarations: {} names, {} excluded, {} properties and {} values rewritten",
            stats.declarations_visited,
            stats.names_discovered,
            stats.names_excluded,
            stats.properties_renamed,
            stats.values_rewritten
        );

        match self.options.output_map_callback.as_mut() {
            Some(callback) => callback(&map),
            None => log::trace!("No output map callback, discarding {} entries", map.len()),
        }

        stats
    }

    pub fn run_stylesheet(&mut self, stylesheet: &mut Stylesheet) -> RenameStats {
        self.run(&mut stylesheet.rules)
    }
}

/// Rename a JSON stylesheet file and write the result to `output_path`
pub fn rename_file(input_path: &str, output_path: &str, renamer: &mut Renamer) -> Result<RenameStats> {
    log::info!("Renaming '{}' to '{}'...", input_path, output_path);

    let source = fs::read_to_string(input_path).map_err(|e| RenameError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;

    let mut stylesheet = Stylesheet::from_json(&source)?;
    let stats = renamer.run_stylesheet(&mut stylesheet);
    fs::write(output_path, stylesheet.to_json()?)?;

    Ok(stats)
}

/// Custom property usages found in one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationUsages {
    pub rule_index: usize,
    pub selector: String,
    pub prop: String,
    /// Name declared by this declaration, if it is a custom property
    pub declares: Option<String>,
    pub usages: Vec<UsageEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unterminated_at: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEntry {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub has_default: bool,
}

/// Read-only report of what a rename would touch. Declarations without any
/// custom property involvement are left out.
pub fn scan_stylesheet(stylesheet: &Stylesheet) -> Vec<DeclarationUsages> {
    let mut report = Vec::new();

    for (rule_index, rule) in stylesheet.rules.iter().enumerate() {
        for declaration in &rule.declarations {
            let scan = scan_value(&declaration.value);
            let declares = custom_property_name(&declaration.prop).map(str::to_string);
            if declares.is_none() && scan.is_empty() && scan.unterminated_at.is_none() {
                continue;
            }

            let usages = scan
                .spans
                .iter()
                .map(|span| UsageEntry {
                    name: span.name(&declaration.value).to_string(),
                    start: span.start,
                    end: span.end,
                    has_default: span.default_range.is_some(),
                })
                .collect();

            report.push(DeclarationUsages {
                rule_index,
                selector: rule.selector.clone(),
                prop: declaration.prop.clone(),
                declares,
                usages,
                unterminated_at: scan.unterminated_at,
            });
        }
    }

    report
}
