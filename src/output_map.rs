//! Original -> renamed mapping, kept in first-discovery order

use crate::resolver::Resolution;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Ordered original -> renamed map with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamingMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RenamingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `original` if it is not present yet. Returns false for a
    /// repeated key; the first entry keeps its position and value.
    pub fn insert(&mut self, original: &str, renamed: &str) -> bool {
        if self.index.contains_key(original) {
            return false;
        }
        self.index.insert(original.to_string(), self.entries.len());
        self.entries.push((original.to_string(), renamed.to_string()));
        true
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(original)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, original: &str) -> bool {
        self.index.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::RenameError::invalid_format(format!("Cannot serialize renaming map: {}", e)))
    }
}

impl Serialize for RenamingMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (original, renamed) in &self.entries {
            map.serialize_entry(original, renamed)?;
        }
        map.end()
    }
}

/// Collects resolutions during one walk
#[derive(Debug, Default)]
pub struct OutputMapBuilder {
    map: RenamingMap,
}

impl OutputMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excluded names are dropped; repeats keep their first position
    pub fn record(&mut self, original: &str, resolution: &Resolution) {
        if resolution.excluded {
            return;
        }
        if self.map.insert(original, &resolution.renamed) {
            log::trace!("New custom property '{}' -> '{}'", original, resolution.renamed);
        }
    }

    pub fn finish(self) -> RenamingMap {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renamed(name: &str) -> Resolution {
        Resolution {
            renamed: name.to_string(),
            excluded: false,
        }
    }

    #[test]
    fn test_first_discovery_order() {
        let mut builder = OutputMapBuilder::new();
        builder.record("b", &renamed("b_"));
        builder.record("a", &renamed("a_"));
        builder.record("b", &renamed("b_"));

        let map = builder.finish();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("a"), Some("a_"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_excluded_not_recorded() {
        let mut builder = OutputMapBuilder::new();
        builder.record(
            "keep",
            &Resolution {
                renamed: "keep".to_string(),
                excluded: true,
            },
        );
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_json_preserves_order() {
        let mut map = RenamingMap::new();
        map.insert("zeta", "zeta_");
        map.insert("alpha", "alpha_");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":"zeta_","alpha":"alpha_"}"#);
    }
}
