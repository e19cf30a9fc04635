//! `var()` discovery inside raw declaration values
//!
//! The scanner works on byte offsets into the value string. Each `var(` is
//! matched to its closing parenthesis by depth counting, split at its first
//! top-level comma into the referenced name and the default expression, and
//! the default expression is then scanned the same way before the scan moves
//! on to the next sibling. Nesting is tracked with an explicit frame stack, so
//! deep defaults cost heap, not call stack.
//!
//! Quoted strings are skipped: parentheses, commas and `var(` inside `"..."`
//! or `'...'` are plain text.

use crate::types::{CUSTOM_PROPERTY_MARKER, VAR_FUNCTION_OPEN};
use std::ops::Range;

/// One `var(...)` call located in a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpan {
    /// Offset of the `v` in `var(`
    pub start: usize,
    /// One past the closing `)`
    pub end: usize,
    /// The identifier after `--`, whitespace trimmed
    pub name_range: Range<usize>,
    /// Everything after the first top-level comma, up to the closing `)`
    pub default_range: Option<Range<usize>>,
}

impl ValueSpan {
    pub fn name<'a>(&self, value: &'a str) -> &'a str {
        &value[self.name_range.clone()]
    }

    pub fn default_expr<'a>(&self, value: &'a str) -> Option<&'a str> {
        self.default_range.clone().map(|range| &value[range])
    }
}

/// Result of scanning one value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueScan {
    /// Spans in discovery order (outer call, then its default, then siblings)
    pub spans: Vec<ValueSpan>,
    /// Offset of a `var(` that never closes; nothing after it was scanned
    pub unterminated_at: Option<usize>,
}

impl ValueScan {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn names<'a>(&'a self, value: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.spans.iter().map(move |span| span.name(value))
    }
}

#[derive(Debug)]
struct Frame {
    cursor: usize,
    end: usize,
}

/// Locate every `var()` usage in `value`.
///
/// Never fails. An unterminated `var(` stops the scan and is reported through
/// [`ValueScan::unterminated_at`].
pub fn scan_value(value: &str) -> ValueScan {
    let bytes = value.as_bytes();
    let mut spans = Vec::new();
    let mut frames = vec![Frame {
        cursor: 0,
        end: bytes.len(),
    }];

    while let Some(frame) = frames.last_mut() {
        let Some(start) = find_var_open(bytes, frame.cursor, frame.end) else {
            frames.pop();
            continue;
        };

        let body_start = start + VAR_FUNCTION_OPEN.len();
        let Some(close) = find_matching_close(bytes, body_start, frame.end) else {
            log::warn!(
                "Unterminated var( at offset {} in '{}', skipping the rest of the value",
                start,
                value
            );
            return ValueScan {
                spans,
                unterminated_at: Some(start),
            };
        };
        frame.cursor = close + 1;

        let comma = find_top_level_comma(bytes, body_start, close);
        let default_range = comma.map(|c| c + 1..close);

        match name_token(value, body_start, comma.unwrap_or(close)) {
            Some(name_range) => {
                log::trace!("Found var(--{}) at {}..{}", &value[name_range.clone()], start, close + 1);
                spans.push(ValueSpan {
                    start,
                    end: close + 1,
                    name_range,
                    default_range: default_range.clone(),
                });
            }
            None => log::trace!("var() at offset {} has no custom property name", start),
        }

        if let Some(range) = default_range {
            frames.push(Frame {
                cursor: range.start,
                end: range.end,
            });
        }
    }

    ValueScan {
        spans,
        unterminated_at: None,
    }
}

/// CSS whitespace is ASCII only; U+00A0 and friends are identifier characters
fn is_css_whitespace(c: char) -> bool {
    c.is_ascii_whitespace()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

/// Index just past the string that opens at `at`, or `end` if it never closes
fn skip_string(bytes: &[u8], at: usize, end: usize) -> usize {
    let quote = bytes[at];
    let mut i = at + 1;
    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    end
}

fn find_var_open(bytes: &[u8], from: usize, end: usize) -> Option<usize> {
    let needle = VAR_FUNCTION_OPEN.as_bytes();
    let mut i = from;
    while i + needle.len() <= end {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i, end);
                continue;
            }
            _ => {}
        }
        if bytes[i..i + needle.len()].eq_ignore_ascii_case(needle)
            && (i == 0 || !is_ident_byte(bytes[i - 1]))
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Closing parenthesis for a call whose body starts at `from` (depth 1)
fn find_matching_close(bytes: &[u8], from: usize, end: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = from;
    while i < end {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i, end);
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn find_top_level_comma(bytes: &[u8], from: usize, to: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;
    while i < to {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i, to);
                continue;
            }
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Range of the identifier after `--` in `value[from..to]`
fn name_token(value: &str, from: usize, to: usize) -> Option<Range<usize>> {
    let raw = &value[from..to];
    let leading = raw.len() - raw.trim_start_matches(is_css_whitespace).len();
    let trimmed = raw.trim_matches(is_css_whitespace);
    let name = trimmed.strip_prefix(CUSTOM_PROPERTY_MARKER)?;
    if name.is_empty() {
        return None;
    }

    let start = from + leading + CUSTOM_PROPERTY_MARKER.len();
    Some(start..start + name.len())
}
