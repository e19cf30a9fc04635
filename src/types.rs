//! Core types and constants for the custom property renamer
//!
//! The renamer never parses CSS itself. Rules and declarations come from an
//! external parser and are reached through [`RuleNode`] and [`DeclarationNode`].
//! [`Stylesheet`] is the serde-backed model used for JSON interchange with
//! such a parser (and by the CLI).

use serde::{Deserialize, Serialize};

// Name Constants
pub const CUSTOM_PROPERTY_MARKER: &str = "--";
pub const VAR_FUNCTION_OPEN: &str = "var(";
pub const DEBUG_SUFFIX: &str = "_";
pub const PREFIX_SEPARATOR: &str = "-";

/// A declaration owned by an external AST.
///
/// The renamer reads both strings and overwrites them in place; it never
/// creates or removes declarations.
pub trait DeclarationNode {
    fn prop(&self) -> &str;
    fn set_prop(&mut self, prop: String);
    fn value(&self) -> &str;
    fn set_value(&mut self, value: String);
}

/// A rule owned by an external AST, holding declarations in document order.
pub trait RuleNode {
    type Declaration: DeclarationNode;

    fn declarations_mut(&mut self) -> &mut [Self::Declaration];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub prop: String,
    #[serde(default)]
    pub value: String,
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
        }
    }
}

impl DeclarationNode for Declaration {
    fn prop(&self) -> &str {
        &self.prop
    }

    fn set_prop(&mut self, prop: String) {
        self.prop = prop;
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    pub fn with_declaration(mut self, prop: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration::new(prop, value));
        self
    }
}

impl RuleNode for Rule {
    type Declaration = Declaration;

    fn declarations_mut(&mut self) -> &mut [Declaration] {
        &mut self.declarations
    }
}

/// Stylesheet as exchanged with an external CSS parser/printer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_json(source: &str) -> crate::Result<Self> {
        serde_json::from_str(source)
            .map_err(|e| crate::RenameError::invalid_format(format!("Invalid stylesheet JSON: {}", e)))
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::RenameError::invalid_format(format!("Cannot serialize stylesheet: {}", e)))
    }

    pub fn declaration_count(&self) -> usize {
        self.rules.iter().map(|r| r.declarations.len()).sum()
    }
}

/// The name portion of a custom property declaration (`--foo` -> `foo`).
/// A bare `--` has no name, same as `var(--)`.
pub fn custom_property_name(prop: &str) -> Option<&str> {
    prop.strip_prefix(CUSTOM_PROPERTY_MARKER)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_property_name() {
        assert_eq!(custom_property_name("--main-color"), Some("main-color"));
        assert_eq!(custom_property_name("color"), None);
        assert_eq!(custom_property_name("-webkit-box"), None);
        assert_eq!(custom_property_name("--"), None);
        assert_eq!(custom_property_name("--a\u{a0}"), Some("a\u{a0}"));
    }

    #[test]
    fn test_stylesheet_json() {
        let json = r#"{"rules":[{"selector":":root","declarations":[{"prop":"--a","value":"red"},{"prop":"color","value":"var(--a)"}]}]}"#;
        let sheet = Stylesheet::from_json(json).unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.declaration_count(), 2);
        assert_eq!(sheet.rules[0].declarations[1].value, "var(--a)");

        let reparsed = Stylesheet::from_json(&sheet.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, sheet);
    }

    #[test]
    fn test_missing_fields_default() {
        let sheet = Stylesheet::from_json(r#"{"rules":[{"declarations":[{"prop":"--empty"}]}]}"#).unwrap();
        assert_eq!(sheet.rules[0].selector, "");
        assert_eq!(sheet.rules[0].declarations[0].value, "");
        assert!(Stylesheet::from_json("not json").is_err());
    }
}
