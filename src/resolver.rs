//! Per-run name resolution with memoization

use crate::options::RenameOptions;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub renamed: String,
    pub excluded: bool,
}

impl Resolution {
    /// True when the CSS text has to change for this name
    pub fn changes(&self, original: &str) -> bool {
        !self.excluded && self.renamed != original
    }
}

/// Resolves original names for a single run.
///
/// The cache lives as long as the resolver, so a name resolves to the same
/// string for the whole walk and exclusion rules run once per name.
pub struct NameResolver<'a> {
    options: &'a RenameOptions,
    resolution_cache: HashMap<String, Resolution>,
}

impl<'a> NameResolver<'a> {
    pub fn new(options: &'a RenameOptions) -> Self {
        Self {
            options,
            resolution_cache: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, name: &str) -> &Resolution {
        if !self.resolution_cache.contains_key(name) {
            let resolution = self.compute(name);
            self.resolution_cache.insert(name.to_string(), resolution);
        }
        &self.resolution_cache[name]
    }

    fn compute(&self, name: &str) -> Resolution {
        if self.options.is_excluded(name) {
            log::debug!("Custom property '{}' is excluded from renaming", name);
            return Resolution {
                renamed: name.to_string(),
                excluded: true,
            };
        }

        Resolution {
            renamed: self.options.decorate(name),
            excluded: false,
        }
    }

    pub fn cached_count(&self) -> usize {
        self.resolution_cache.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.resolution_cache.values().filter(|r| r.excluded).count()
    }
}
