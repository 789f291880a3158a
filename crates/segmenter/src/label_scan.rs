//! Line-anchored boundary scanning for label-delimited assembly sources.

use crate::config::ScanConfig;
use crate::metadata;
use crate::types::{SegmentKind, SegmentMetadata, SegmentRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// A label line: identifier + colon, optionally followed by a comment
static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+):\s*(?:;.*)?$").expect("label pattern is valid"));

/// Return-class mnemonics that terminate a routine in bank-dump variants
static RETURN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?i:RTS|RTL|RTI)\b").expect("return pattern is valid"));

struct OpenRoutine {
    name: String,
    start: usize,
    comments: Vec<String>,
    numeric_refs: BTreeSet<String>,
    call_targets: BTreeSet<String>,
    first_address: Option<String>,
}

impl OpenRoutine {
    fn new(name: String, start: usize) -> Self {
        Self {
            name,
            start,
            comments: Vec::new(),
            numeric_refs: BTreeSet::new(),
            call_targets: BTreeSet::new(),
            first_address: None,
        }
    }

    fn absorb_line(&mut self, line: &str, marker: &str) {
        if let Some(comment) = metadata::line_comment(line, marker) {
            self.comments.push(comment);
        }
        let first = metadata::collect_addresses(line, &mut self.numeric_refs);
        if self.first_address.is_none() {
            self.first_address = first;
        }
        metadata::collect_asm_calls(line, &mut self.call_targets);
    }
}

/// Partition label-delimited text into routine segments.
///
/// A routine opens at a label line and closes at the earliest of: a blank
/// line, the first return mnemonic (when `stop_at_return` is set), the
/// configured maximum line count, or the line before the next label. The
/// checks run in that fixed order on every line, so termination is
/// deterministic. Metadata is collected in the same pass.
pub(crate) fn scan(
    content: &str,
    file_path: &str,
    collection: &str,
    config: &ScanConfig,
) -> Vec<SegmentRecord> {
    let marker = config.comment_marker.as_deref().unwrap_or(";");
    let lines: Vec<&str> = content.lines().collect();
    let mut segments = Vec::new();
    let mut current: Option<OpenRoutine> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some(captures) = LABEL_RE.captures(trimmed) {
            if let Some(open) = current.take() {
                if let Some(segment) = finish(open, i - 1, &lines, file_path, collection, config) {
                    segments.push(segment);
                }
            }
            let mut open = OpenRoutine::new(captures[1].to_string(), i);
            open.absorb_line(line, marker);
            current = Some(open);
            continue;
        }

        if current.is_none() {
            continue;
        }

        let mut close_at = None;
        if trimmed.is_empty() {
            close_at = Some(i - 1);
        } else if let Some(open) = current.as_mut() {
            open.absorb_line(line, marker);

            let hit_return = config.stop_at_return && RETURN_RE.is_match(trimmed);
            let hit_max = i - open.start + 1 >= config.max_routine_lines;
            let next_is_label = lines
                .get(i + 1)
                .is_some_and(|next| LABEL_RE.is_match(next.trim()));

            if hit_return || hit_max || next_is_label {
                close_at = Some(i);
            }
        }

        if let Some(end) = close_at {
            if let Some(open) = current.take() {
                if let Some(segment) = finish(open, end, &lines, file_path, collection, config) {
                    segments.push(segment);
                }
            }
        }
    }

    // Trailing routine closes at EOF
    if let Some(open) = current.take() {
        let end = lines.len().saturating_sub(1);
        if let Some(segment) = finish(open, end, &lines, file_path, collection, config) {
            segments.push(segment);
        }
    }

    segments
}

fn finish(
    open: OpenRoutine,
    end: usize,
    lines: &[&str],
    file_path: &str,
    collection: &str,
    config: &ScanConfig,
) -> Option<SegmentRecord> {
    let line_count = end - open.start + 1;
    if line_count < config.min_segment_lines {
        return None;
    }

    let raw_text = lines[open.start..=end].join("\n");
    let mut meta = SegmentMetadata::new(SegmentKind::Routine, open.name);
    meta.address = open.first_address;
    meta.comments = open.comments;
    meta.numeric_refs = open.numeric_refs;
    meta.call_targets = open.call_targets;

    Some(SegmentRecord::new(
        collection.to_string(),
        file_path.to_string(),
        open.start + 1,
        end + 1,
        raw_text,
        meta,
    ))
}
