//! Side extraction of comments, address literals and call targets.
//!
//! These helpers run inside the same line-by-line traversal the boundary
//! scanners use, so metadata never needs a second pass over the text. None of
//! them can fail: a line that matches nothing contributes nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Bank-qualified address literal, e.g. `$7E:0E20`
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$([0-9A-Fa-f]{2}):([0-9A-Fa-f]{4})").expect("address pattern is valid")
});

/// JSR/JSL call with a symbolic target
static ASM_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?i:JSR|JSL)\s+(\w+)").expect("call pattern is valid"));

/// Unqualified identifier immediately followed by an opening paren
static CALLSITE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(").expect("callsite pattern is valid"));

/// C++ keywords that look like call sites to the callsite pattern
const CPP_CALL_STOPLIST: &[&str] = &[
    "if", "while", "for", "switch", "return", "sizeof", "new", "delete", "catch", "throw",
    "static_cast", "reinterpret_cast", "const_cast", "dynamic_cast", "defined",
];

/// Collect normalized `$BB:AAAA` literals from a line into the ref set.
/// Returns the first literal on the line, for identity-key use.
pub(crate) fn collect_addresses(line: &str, refs: &mut BTreeSet<String>) -> Option<String> {
    let mut first = None;
    for captures in ADDRESS_RE.captures_iter(line) {
        let normalized = format!(
            "${}:{}",
            captures[1].to_uppercase(),
            captures[2].to_uppercase()
        );
        if first.is_none() {
            first = Some(normalized.clone());
        }
        refs.insert(normalized);
    }
    first
}

/// Collect JSR/JSL targets from a line into the call set
pub(crate) fn collect_asm_calls(line: &str, calls: &mut BTreeSet<String>) {
    for captures in ASM_CALL_RE.captures_iter(line) {
        calls.insert(captures[1].to_string());
    }
}

/// Collect `ident(` call sites from a line, skipping C++ keywords.
/// Self-calls are deliberately kept.
pub(crate) fn collect_cpp_calls(line: &str, calls: &mut BTreeSet<String>) {
    for captures in CALLSITE_RE.captures_iter(line) {
        let target = &captures[1];
        if CPP_CALL_STOPLIST.contains(&target) {
            continue;
        }
        calls.insert(target.to_string());
    }
}

/// Extract the comment text after `marker`, trimmed; None when the line has
/// no marker or the comment is empty
pub(crate) fn line_comment(line: &str, marker: &str) -> Option<String> {
    let start = line.find(marker)?;
    let text = line[start + marker.len()..].trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Find a comment directly above a declaration line.
///
/// A `//` line immediately above wins; otherwise a `/* ... */` block whose
/// closer sits immediately above is collected by scanning backward at most
/// `lookback` lines for the opener. Comment tokens are stripped so the result
/// reads as plain text.
pub(crate) fn leading_comment(lines: &[&str], decl_idx: usize, lookback: usize) -> Option<String> {
    if decl_idx == 0 {
        return None;
    }

    let prev = lines[decl_idx - 1].trim();
    if let Some(text) = prev.strip_prefix("//") {
        let text = text.trim();
        return if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
    }

    if !prev.ends_with("*/") {
        return None;
    }

    let floor = decl_idx.saturating_sub(lookback);
    let opener = (floor..decl_idx).rev().find(|&i| lines[i].contains("/*"))?;

    let mut parts = Vec::new();
    for raw in &lines[opener..decl_idx] {
        let stripped = raw
            .trim()
            .trim_start_matches("/**")
            .trim_start_matches("/*")
            .trim_end_matches("*/")
            .trim_start_matches('*')
            .trim();
        if !stripped.is_empty() {
            parts.push(stripped.to_string());
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
