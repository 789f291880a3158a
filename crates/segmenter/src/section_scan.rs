//! Heading-delimited boundary scanning for documentation sources.

use crate::config::ScanConfig;
use crate::metadata;
use crate::types::{SegmentKind, SegmentMetadata, SegmentRecord};
use std::collections::BTreeSet;
use std::path::Path;

struct OpenSection {
    heading: String,
    hierarchy: Vec<String>,
    start: usize,
    body_chars: usize,
    numeric_refs: BTreeSet<String>,
}

/// Partition a documentation file into heading-delimited sections.
///
/// `#` headings open sections; a stack of enclosing headings provides the
/// hierarchy. Fenced code blocks are tracked so a `#` inside a fence neither
/// splits a section nor counts as a heading. A file with no headings at all
/// (plain-text guides) becomes a single section named after the file stem.
pub(crate) fn scan(
    content: &str,
    file_path: &str,
    collection: &str,
    config: &ScanConfig,
) -> Vec<SegmentRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let mut segments = Vec::new();
    let mut heading_stack: Vec<(usize, String)> = Vec::new();
    let mut current: Option<OpenSection> = None;
    let mut in_fence = false;
    let mut saw_heading = false;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }

        if !in_fence && trimmed.starts_with('#') {
            saw_heading = true;
            if let Some(open) = current.take() {
                if let Some(segment) = finish(open, i - 1, &lines, file_path, collection, config) {
                    segments.push(segment);
                }
            }

            let level = trimmed.chars().take_while(|&c| c == '#').count();
            let heading = trimmed.trim_start_matches('#').trim().to_string();

            heading_stack.retain(|(lvl, _)| *lvl < level);
            heading_stack.push((level, heading.clone()));

            current = Some(OpenSection {
                heading,
                hierarchy: heading_stack.iter().map(|(_, h)| h.clone()).collect(),
                start: i,
                body_chars: 0,
                numeric_refs: BTreeSet::new(),
            });
            continue;
        }

        if let Some(open) = current.as_mut() {
            if !in_fence {
                open.body_chars += trimmed.len();
                metadata::collect_addresses(line, &mut open.numeric_refs);
            }
        }
    }

    if let Some(open) = current.take() {
        let end = lines.len().saturating_sub(1);
        if let Some(segment) = finish(open, end, &lines, file_path, collection, config) {
            segments.push(segment);
        }
    }

    // Plain-text files and heading-less markdown: the whole file is one section
    if !saw_heading && segments.is_empty() && !lines.is_empty() {
        let stem = Path::new(file_path)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("unknown")
            .to_string();
        let open = OpenSection {
            heading: stem.clone(),
            hierarchy: vec![stem],
            start: 0,
            body_chars: content.len(),
            numeric_refs: {
                let mut refs = BTreeSet::new();
                for line in &lines {
                    metadata::collect_addresses(line, &mut refs);
                }
                refs
            },
        };
        if let Some(segment) = finish(open, lines.len() - 1, &lines, file_path, collection, config)
        {
            segments.push(segment);
        }
    }

    segments
}

fn finish(
    open: OpenSection,
    end: usize,
    lines: &[&str],
    file_path: &str,
    collection: &str,
    config: &ScanConfig,
) -> Option<SegmentRecord> {
    if open.body_chars < config.min_section_chars {
        return None;
    }

    let raw_text = lines[open.start..=end].join("\n");
    let mut meta =
        SegmentMetadata::new(SegmentKind::Section, open.heading).hierarchy(open.hierarchy);
    meta.numeric_refs = open.numeric_refs;

    Some(SegmentRecord::new(
        collection.to_string(),
        file_path.to_string(),
        open.start + 1,
        end + 1,
        raw_text,
        meta,
    ))
}
