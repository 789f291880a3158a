//! Brace-balanced boundary scanning for block-structured C++ sources.
//!
//! Brace counting is line-granular: each line contributes its net `{`/`}`
//! delta, so braces inside string literals or trailing comments can skew a
//! boundary. This is a known approximation carried over deliberately; callers
//! that need exact parsing should not use this scanner.

use crate::config::ScanConfig;
use crate::metadata;
use crate::types::{SegmentKind, SegmentMetadata, SegmentRecord};
use once_cell::sync::Lazy;
use regex::Regex;

/// Class or struct declaration, optionally with a base clause
static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:class|struct)\s+(?P<name>\w+)\s*(?::\s*(?:public|private|protected)\s+[\w:]+)?\s*(?:\{|$)")
        .expect("class pattern is valid")
});

/// Qualified method implementation: `ReturnType Class::name(params)`
static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<ret>[\w:<>\s\*&~]+?)\s+(?P<class>\w+)::(?P<name>~?\w+)\s*\((?P<params>[^)]*)\)\s*(?:const)?\s*(?:override)?\s*(?:\{|$)",
    )
    .expect("method pattern is valid")
});

/// Free function declaration: `return-type name(params)`
static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<ret>[\w:<>\s\*&]+?)\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*(?:const)?\s*(?:override)?\s*(?:\{|$)",
    )
    .expect("function pattern is valid")
});

/// Statement keywords that the function pattern would otherwise mistake for
/// a return type or name
const DECL_STOPLIST: &[&str] = &["return", "else", "throw", "delete", "new", "case", "goto"];

struct Declaration {
    kind: SegmentKind,
    name: String,
    signature: String,
    parent_scope: Option<String>,
}

/// Partition block-structured text into function, class and method segments.
///
/// One forward scan: each candidate line is matched against the class, method
/// and function shapes in that order. The opening brace may sit on the
/// declaration line or within `declaration_lookahead` lines; prototypes are
/// skipped. After a block closes, the scan resumes past it, so nested
/// declarations are never re-emitted. A block still open at EOF is discarded.
pub(crate) fn scan(
    content: &str,
    file_path: &str,
    collection: &str,
    config: &ScanConfig,
) -> Vec<SegmentRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with("/*") {
            i += 1;
            continue;
        }

        let Some(decl) = match_declaration(trimmed) else {
            i += 1;
            continue;
        };

        let Some(close) = balance_block(&lines, i, config.declaration_lookahead) else {
            // Prototype, or a block left unbalanced at EOF
            i += 1;
            continue;
        };

        if let Some(segment) =
            build_segment(decl, &lines, i, close, file_path, collection, config)
        {
            segments.push(segment);
        }
        i = close + 1;
    }

    segments
}

fn match_declaration(trimmed: &str) -> Option<Declaration> {
    if let Some(captures) = CLASS_RE.captures(trimmed) {
        let name = captures["name"].to_string();
        return Some(Declaration {
            kind: SegmentKind::Class,
            signature: format!("class {name}"),
            name,
            parent_scope: None,
        });
    }

    if let Some(captures) = METHOD_RE.captures(trimmed) {
        let ret = captures["ret"].trim().to_string();
        if DECL_STOPLIST.contains(&ret.as_str()) {
            return None;
        }
        let class = captures["class"].to_string();
        let name = captures["name"].to_string();
        return Some(Declaration {
            kind: SegmentKind::Method,
            signature: format!("{ret} {class}::{name}({})", &captures["params"]),
            name,
            parent_scope: Some(class),
        });
    }

    if let Some(captures) = FUNCTION_RE.captures(trimmed) {
        let ret = captures["ret"].trim().to_string();
        let name = captures["name"].to_string();
        if DECL_STOPLIST.contains(&ret.as_str()) || DECL_STOPLIST.contains(&name.as_str()) {
            return None;
        }
        return Some(Declaration {
            kind: SegmentKind::Function,
            signature: format!("{ret} {name}({})", &captures["params"]),
            name,
            parent_scope: None,
        });
    }

    None
}

/// Find the line index where the declaration's block closes.
///
/// Returns None when no `{` appears within the lookahead (a prototype) or the
/// brace count never returns to zero before EOF.
fn balance_block(lines: &[&str], decl_idx: usize, lookahead: usize) -> Option<usize> {
    // A `;` before any `{` marks a pure declaration
    let decl = lines[decl_idx];
    match (decl.find(';'), decl.find('{')) {
        (Some(semi), Some(brace)) if semi < brace => return None,
        (Some(_), None) => return None,
        _ => {}
    }

    if !decl.contains('{') {
        let horizon = (decl_idx + 1 + lookahead).min(lines.len());
        let mut opened = false;
        for line in &lines[decl_idx + 1..horizon] {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('{') {
                opened = true;
            }
            break;
        }
        if !opened {
            return None;
        }
    }

    let mut depth: i64 = 0;
    let mut went_positive = false;

    for (offset, line) in lines[decl_idx..].iter().enumerate() {
        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;

        // A line whose braces open and close together nets zero, so track
        // the opening before applying the delta
        if opens > 0 {
            went_positive = true;
        }
        depth += opens - closes;

        if went_positive && depth <= 0 {
            return Some(decl_idx + offset);
        }
    }

    log::debug!("Discarding unbalanced block at line {}", decl_idx + 1);
    None
}

fn build_segment(
    decl: Declaration,
    lines: &[&str],
    start: usize,
    end: usize,
    file_path: &str,
    collection: &str,
    config: &ScanConfig,
) -> Option<SegmentRecord> {
    let raw_text = lines[start..=end].join("\n");
    if raw_text.len() < config.min_segment_chars {
        return None;
    }

    let marker = config.comment_marker.as_deref().unwrap_or("//");
    let mut meta = SegmentMetadata::new(decl.kind, decl.name)
        .signature(decl.signature);
    meta.parent_scope = decl.parent_scope;

    if let Some(doc) = metadata::leading_comment(lines, start, config.block_comment_lookback) {
        meta.comments.push(doc);
    }

    for (offset, line) in lines[start..=end].iter().enumerate() {
        if let Some(comment) = metadata::line_comment(line, marker) {
            meta.comments.push(comment);
        }
        let first = metadata::collect_addresses(line, &mut meta.numeric_refs);
        if meta.address.is_none() {
            meta.address = first;
        }
        // The declaration line itself is not a call site
        if offset > 0 {
            metadata::collect_cpp_calls(line, &mut meta.call_targets);
        }
    }

    Some(SegmentRecord::new(
        collection.to_string(),
        file_path.to_string(),
        start + 1,
        end + 1,
        raw_text,
        meta,
    ))
}
