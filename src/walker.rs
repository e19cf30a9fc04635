//! Walks external rules and renames custom properties in place

use crate::output_map::{OutputMapBuilder, RenamingMap};
use crate::resolver::NameResolver;
use crate::rewriter::{apply_replacements, rewrite_property_name, Replacement};
use crate::scanner::scan_value;
use crate::types::{custom_property_name, DeclarationNode, RuleNode};
use serde::Serialize;

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameStats {
    pub rules_visited: usize,
    pub declarations_visited: usize,
    pub properties_renamed: usize,
    pub values_rewritten: usize,
    pub names_discovered: usize,
    pub names_excluded: usize,
    pub unterminated_values: usize,
}

pub struct DeclarationWalker<'a> {
    resolver: NameResolver<'a>,
    builder: OutputMapBuilder,
    stats: RenameStats,
}

impl<'a> DeclarationWalker<'a> {
    pub fn new(resolver: NameResolver<'a>) -> Self {
        Self {
            resolver,
            builder: OutputMapBuilder::new(),
            stats: RenameStats::default(),
        }
    }

    pub fn walk_rules<R: RuleNode>(&mut self, rules: &mut [R]) {
        for rule in rules.iter_mut() {
            self.stats.rules_visited += 1;
            for declaration in rule.declarations_mut() {
                self.walk_declaration(declaration);
            }
        }
    }

    pub fn walk_declaration<D: DeclarationNode>(&mut self, declaration: &mut D) {
        self.stats.declarations_visited += 1;

        if let Some(name) = custom_property_name(declaration.prop()) {
            let name = name.to_string();
            let resolution = self.resolver.resolve(&name);
            self.builder.record(&name, resolution);

            if resolution.changes(&name) {
                let prop = rewrite_property_name(declaration.prop(), &resolution.renamed);
                log::debug!("Renamed declaration {} -> {}", declaration.prop(), prop);
                declaration.set_prop(prop);
                self.stats.properties_renamed += 1;
            }
        }

        if let Some(value) = self.rewrite_value(declaration.value()) {
            log::debug!("Rewrote value '{}' -> '{}'", declaration.value(), value);
            declaration.set_value(value);
            self.stats.values_rewritten += 1;
        }
    }

    /// New value text, or None when nothing in it changes
    fn rewrite_value(&mut self, value: &str) -> Option<String> {
        let scan = scan_value(value);
        if scan.unterminated_at.is_some() {
            self.stats.unterminated_values += 1;
        }

        let mut replacements = Vec::new();
        for span in &scan.spans {
            let name = span.name(value);
            let resolution = self.resolver.resolve(name);
            self.builder.record(name, resolution);

            if resolution.changes(name) {
                replacements.push(Replacement::new(
                    span.name_range.clone(),
                    resolution.renamed.clone(),
                ));
            }
        }

        if replacements.is_empty() {
            None
        } else {
            Some(apply_replacements(value, replacements))
        }
    }

    pub fn finish(mut self) -> (RenamingMap, RenameStats) {
        self.stats.names_discovered = self.resolver.cached_count();
        self.stats.names_excluded = self.resolver.excluded_count();
        (self.builder.finish(), self.stats)
    }
}
