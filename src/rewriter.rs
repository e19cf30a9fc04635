//! Identifier substitution that leaves every other byte of the input alone

use crate::types::CUSTOM_PROPERTY_MARKER;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub range: Range<usize>,
    pub text: String,
}

impl Replacement {
    pub fn new(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Apply non-overlapping replacements to `original`.
///
/// Edits run from the highest start offset down, so lengths changed by one
/// edit never shift the offsets of the edits still pending.
pub fn apply_replacements(original: &str, mut replacements: Vec<Replacement>) -> String {
    if replacements.is_empty() {
        return original.to_string();
    }

    replacements.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut result = original.to_string();
    for replacement in replacements {
        result.replace_range(replacement.range, &replacement.text);
    }
    result
}

/// `--old` -> `--renamed`; anything that is not a custom property is returned as is
pub fn rewrite_property_name(prop: &str, renamed: &str) -> String {
    match prop.strip_prefix(CUSTOM_PROPERTY_MARKER) {
        Some(_) => format!("{}{}", CUSTOM_PROPERTY_MARKER, renamed),
        None => prop.to_string(),
    }
}
