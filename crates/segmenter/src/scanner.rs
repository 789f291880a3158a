//! Entry point dispatching content to the per-dialect scan strategies.

use crate::block_scan;
use crate::config::ScanConfig;
use crate::dialect::SourceDialect;
use crate::error::{Result, SegmenterError};
use crate::label_scan;
use crate::section_scan;
use crate::types::SegmentRecord;

/// Boundary scanner for a single source text.
///
/// Holds a validated [`ScanConfig`] and dispatches to the strategy matching
/// the source dialect. The scanner is stateless between calls, so one
/// instance can segment any number of files.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: ScanConfig,
}

impl Segmenter {
    /// Create a segmenter with the given configuration
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a segmenter with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    /// Get the active configuration
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Segment `content` using the strategy for `dialect`.
    ///
    /// Returns segments ordered by start line; records never overlap within
    /// one strategy. Empty content is an error so callers can distinguish a
    /// file with no extractable units (empty Vec) from a file with nothing
    /// in it.
    pub fn extract(
        &self,
        content: &str,
        file_path: &str,
        collection: &str,
        dialect: SourceDialect,
    ) -> Result<Vec<SegmentRecord>> {
        if content.trim().is_empty() {
            return Err(SegmenterError::EmptyContent);
        }

        let mut segments = match dialect {
            SourceDialect::Assembly => label_scan::scan(content, file_path, collection, &self.config),
            SourceDialect::CStyle => block_scan::scan(content, file_path, collection, &self.config),
            SourceDialect::Markdown => {
                section_scan::scan(content, file_path, collection, &self.config)
            }
        };

        segments.sort_by_key(|segment| segment.start_line);

        log::debug!(
            "Extracted {} segments from {} ({})",
            segments.len(),
            file_path,
            dialect.as_str()
        );

        Ok(segments)
    }

    /// Segment `content`, detecting the dialect from the file extension.
    ///
    /// Files with an unrecognized extension yield no segments rather than an
    /// error, so directory walks can feed every file through without
    /// filtering first.
    pub fn extract_str(
        &self,
        content: &str,
        file_path: &str,
        collection: &str,
    ) -> Result<Vec<SegmentRecord>> {
        match SourceDialect::from_path(file_path) {
            Some(dialect) => self.extract(content, file_path, collection, dialect),
            None => Ok(Vec::new()),
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SegmentKind;
    use pretty_assertions::assert_eq;

    fn lenient() -> Segmenter {
        Segmenter {
            config: ScanConfig {
                min_segment_lines: 2,
                min_segment_chars: 1,
                min_section_chars: 10,
                ..Default::default()
            },
        }
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = ScanConfig {
            max_routine_lines: 0,
            ..Default::default()
        };
        assert!(Segmenter::new(config).is_err());
    }

    #[test]
    fn empty_content_is_an_error() {
        let segmenter = Segmenter::with_defaults();
        let result = segmenter.extract("   \n\n", "bank_00.asm", "vanilla", SourceDialect::Assembly);
        assert!(matches!(result, Err(SegmenterError::EmptyContent)));
    }

    #[test]
    fn dialect_routes_to_matching_strategy() {
        let segmenter = lenient();

        let asm = segmenter
            .extract("Foo:\n  a\n  b\n", "x.asm", "c", SourceDialect::Assembly)
            .map(|s| s[0].metadata.kind);
        assert_eq!(asm.ok(), Some(SegmentKind::Routine));

        let cpp = segmenter
            .extract(
                "int Add(int a, int b) { return a + b; }",
                "x.cc",
                "c",
                SourceDialect::CStyle,
            )
            .map(|s| s[0].metadata.kind);
        assert_eq!(cpp.ok(), Some(SegmentKind::Function));

        let md = segmenter
            .extract(
                "# Hooks\nBody text long enough.\n",
                "x.md",
                "c",
                SourceDialect::Markdown,
            )
            .map(|s| s[0].metadata.kind);
        assert_eq!(md.ok(), Some(SegmentKind::Section));
    }

    #[test]
    fn extract_str_detects_dialect_from_extension() {
        let segmenter = lenient();
        let segments = segmenter
            .extract_str("Foo:\n  a\n  b\n", "banks/bank_00.asm", "vanilla")
            .unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].metadata.kind, SegmentKind::Routine);
    }

    #[test]
    fn unknown_extension_yields_no_segments() {
        let segmenter = lenient();
        let segments = segmenter
            .extract_str("{\"key\": 1}", "data.json", "vanilla")
            .unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn segments_come_back_ordered_by_start_line() {
        let segmenter = lenient();
        let content = "A:\n 1\n 2\n\nB:\n 3\n 4\n";
        let segments = segmenter
            .extract(content, "x.asm", "c", SourceDialect::Assembly)
            .unwrap();
        assert_eq!(segments.len(), 2);
        assert!(segments[0].start_line < segments[1].start_line);
    }
}
