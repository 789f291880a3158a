//! Directory-level extraction over a source tree.

use crate::config::ScanConfig;
use crate::dialect::SourceDialect;
use crate::error::Result;
use crate::scanner::Segmenter;
use crate::types::SegmentRecord;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Files larger than this are skipped; disassembly banks and editor sources
/// stay well under it
const MAX_FILE_SIZE_BYTES: u64 = 1_048_576;

/// Walks a directory tree and segments every file with a recognized dialect
pub struct CorpusScanner {
    root: PathBuf,
    collection: String,
    segmenter: Segmenter,
}

impl CorpusScanner {
    /// Create a scanner rooted at `root`, tagging records with `collection`
    pub fn new(root: impl AsRef<Path>, collection: impl Into<String>, config: ScanConfig) -> Result<Self> {
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            collection: collection.into(),
            segmenter: Segmenter::new(config)?,
        })
    }

    /// Scan the tree and return all extracted segments (.gitignore aware).
    ///
    /// Unreadable and non-UTF-8 files are logged and skipped rather than
    /// aborting the walk. Results are sorted by file path then start line.
    pub fn scan(&self) -> Vec<SegmentRecord> {
        let mut segments = Vec::new();
        let mut files_seen = 0usize;

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if SourceDialect::from_path(path).is_none() {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    files_seen += 1;
                    segments.extend(self.scan_file(path));
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        segments.sort_by(|a, b| {
            (a.file_path.as_str(), a.start_line).cmp(&(b.file_path.as_str(), b.start_line))
        });

        log::info!(
            "Extracted {} segments from {} files under {}",
            segments.len(),
            files_seen,
            self.root.display()
        );
        segments
    }

    fn scan_file(&self, path: &Path) -> Vec<SegmentRecord> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping unreadable file {}: {e}", path.display());
                return Vec::new();
            }
        };

        let relative = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        match self
            .segmenter
            .extract_str(&content, &relative, &self.collection)
        {
            Ok(segments) => segments,
            Err(e) => {
                log::debug!("No segments from {relative}: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn lenient() -> ScanConfig {
        ScanConfig {
            min_segment_lines: 2,
            min_segment_chars: 1,
            min_section_chars: 10,
            ..Default::default()
        }
    }

    #[test]
    fn walk_collects_segments_across_dialects() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "banks/bank_00.asm", "Foo:\n  op1\n  op2\n");
        write_file(
            dir.path(),
            "src/rom.cc",
            "int Add(int a, int b) { return a + b; }\n",
        );
        write_file(dir.path(), "docs/hooks.md", "# Hooks\nBody text long enough.\n");
        write_file(dir.path(), "data/table.json", "{\"unused\": true}\n");

        let scanner = CorpusScanner::new(dir.path(), "vanilla", lenient()).unwrap();
        let segments = scanner.scan();

        assert_eq!(segments.len(), 3);
        let names: Vec<&str> = segments.iter().map(|s| s.metadata.name.as_str()).collect();
        assert!(names.contains(&"Foo"));
        assert!(names.contains(&"Add"));
        assert!(names.contains(&"Hooks"));
    }

    #[test]
    fn results_are_sorted_by_path_then_line() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.asm", "B1:\n 1\n 2\n\nB2:\n 3\n 4\n");
        write_file(dir.path(), "a.asm", "A1:\n 1\n 2\n");

        let scanner = CorpusScanner::new(dir.path(), "vanilla", lenient()).unwrap();
        let segments = scanner.scan();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].file_path, "a.asm");
        assert_eq!(segments[1].file_path, "b.asm");
        assert!(segments[1].start_line < segments[2].start_line);
    }

    #[test]
    fn non_utf8_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("garbage.asm")).unwrap();
        f.write_all(&[0xFF, 0xFE, 0x00, 0x90, 0xA5]).unwrap();
        write_file(dir.path(), "good.asm", "Ok:\n 1\n 2\n");

        let scanner = CorpusScanner::new(dir.path(), "vanilla", lenient()).unwrap();
        let segments = scanner.scan();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].metadata.name, "Ok");
    }

    #[test]
    fn record_paths_are_relative_to_the_root() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "banks/bank_01.asm", "Foo:\n 1\n 2\n");

        let scanner = CorpusScanner::new(dir.path(), "vanilla", lenient()).unwrap();
        let segments = scanner.scan();

        assert_eq!(segments.len(), 1);
        assert!(segments[0].file_path.starts_with("banks"));
    }
}
