//! Purpose: Encode and decode delimiter-separated lists stored inside one value string.
//! Exports: `decode`, `encode`, `SEPARATOR`, `ESCAPE`.
//! Invariants: `decode(&encode(items)) == items` for non-empty lists of trimmed elements.
//! Invariants: A separator preceded by the escape character is literal and never splits.
//! Invariants: Decoding the empty string yields exactly one empty element.

use crate::core::trim::trim;

pub const SEPARATOR: char = ',';
pub const ESCAPE: char = '\\';

/// Split `raw` on unescaped separators and unescape each element.
///
/// Escape handling and element trimming happen in one pass: `\x` contributes
/// a literal `x`, a dangling trailing escape is dropped, and each finished
/// element is trimmed of surrounding whitespace.
pub fn decode(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for ch in raw.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else if ch == SEPARATOR {
            items.push(trim(&current).to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    items.push(trim(&current).to_string());

    items
}

/// Join elements with the separator, escaping separators and escape
/// characters inside each element.
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(SEPARATOR);
        }
        for ch in item.as_ref().chars() {
            if ch == SEPARATOR || ch == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(ch);
        }
    }
    out
}
