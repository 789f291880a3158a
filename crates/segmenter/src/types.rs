use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// A boundaried unit of source text with structural metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentRecord {
    /// Source collection this segment was mined from (e.g. "vanilla", "hack")
    pub collection: String,

    /// Source file path
    pub file_path: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Exact source slice, boundary line(s) included
    pub raw_text: String,

    /// Structural metadata collected during the boundary scan
    pub metadata: SegmentMetadata,
}

impl SegmentRecord {
    /// Create a new segment record
    #[must_use]
    pub const fn new(
        collection: String,
        file_path: String,
        start_line: usize,
        end_line: usize,
        raw_text: String,
        metadata: SegmentMetadata,
    ) -> Self {
        Self {
            collection,
            file_path,
            start_line,
            end_line,
            raw_text,
            metadata,
        }
    }

    /// Stable composite key used for deduplication and idempotent re-scans.
    ///
    /// The key shape follows the segment kind: routines key on collection, name
    /// and first address literal (falling back to the start line when the
    /// disassembly carries no address comment); block kinds key on file, kind
    /// and name; sections key on collection, file stem and heading.
    #[must_use]
    pub fn identity(&self) -> String {
        match self.metadata.kind {
            SegmentKind::Routine => {
                let address = self
                    .metadata
                    .address
                    .clone()
                    .unwrap_or_else(|| format!("L{}", self.start_line));
                format!("{}:{}:{}", self.collection, self.metadata.name, address)
            }
            SegmentKind::Function | SegmentKind::Class | SegmentKind::Method => format!(
                "{}:{}:{}",
                self.file_path,
                self.metadata.kind.as_str(),
                self.metadata.name
            ),
            SegmentKind::Section => {
                let stem = Path::new(&self.file_path)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("unknown");
                format!("{}:{}:{}", self.collection, stem, self.metadata.name)
            }
        }
    }

    /// Get the number of lines in this segment
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if the segment contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Metadata about a segment, collected in the same pass as boundary detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentMetadata {
    /// What kind of unit this segment is
    pub kind: SegmentKind,

    /// Unit name (routine label, function name, class name, heading)
    pub name: String,

    /// First normalized address literal seen in the segment, if any
    pub address: Option<String>,

    /// Declaration signature for block kinds
    pub signature: Option<String>,

    /// Enclosing class for methods
    pub parent_scope: Option<String>,

    /// Extracted comment strings in source order, not deduplicated
    #[serde(default)]
    pub comments: Vec<String>,

    /// Normalized bank:offset address literals, deduplicated
    #[serde(default)]
    pub numeric_refs: BTreeSet<String>,

    /// Symbols referenced via call-like constructs, deduplicated
    #[serde(default)]
    pub call_targets: BTreeSet<String>,

    /// Enclosing heading labels outermost-first; empty for code kinds
    #[serde(default)]
    pub hierarchy: Vec<String>,
}

impl SegmentMetadata {
    /// Create metadata with kind and name only
    pub fn new(kind: SegmentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            address: None,
            signature: None,
            parent_scope: None,
            comments: Vec::new(),
            numeric_refs: BTreeSet::new(),
            call_targets: BTreeSet::new(),
            hierarchy: Vec::new(),
        }
    }

    /// Builder: set declaration signature
    #[must_use]
    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Builder: set enclosing class
    #[must_use]
    pub fn parent_scope(mut self, scope: impl Into<String>) -> Self {
        self.parent_scope = Some(scope.into());
        self
    }

    /// Builder: set section hierarchy
    #[must_use]
    pub fn hierarchy(mut self, hierarchy: Vec<String>) -> Self {
        self.hierarchy = hierarchy;
        self
    }
}

/// Kind of extracted segment; determines which scan strategy produced it
/// and which metadata fields are meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum SegmentKind {
    /// Label-delimited assembly routine
    Routine,
    /// Free function in a block-structured source
    Function,
    /// Class or struct definition
    Class,
    /// Qualified method implementation
    Method,
    /// Heading-delimited documentation section
    Section,
}

impl SegmentKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Section => "section",
        }
    }

    /// Check if this kind can carry call targets
    #[must_use]
    pub const fn is_callable(self) -> bool {
        !matches!(self, Self::Section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(kind: SegmentKind, name: &str) -> SegmentRecord {
        SegmentRecord::new(
            "vanilla".to_string(),
            "bank_00.asm".to_string(),
            10,
            20,
            "Label:\n    RTS".to_string(),
            SegmentMetadata::new(kind, name),
        )
    }

    #[test]
    fn test_line_count() {
        let segment = record(SegmentKind::Routine, "Foo");
        assert_eq!(segment.line_count(), 11);
    }

    #[test]
    fn test_contains_line() {
        let segment = record(SegmentKind::Routine, "Foo");
        assert!(segment.contains_line(10));
        assert!(segment.contains_line(20));
        assert!(!segment.contains_line(9));
        assert!(!segment.contains_line(21));
    }

    #[test]
    fn routine_identity_uses_address_when_present() {
        let mut segment = record(SegmentKind::Routine, "LoadPlayerState");
        segment.metadata.address = Some("$7E:0E20".to_string());
        assert_eq!(segment.identity(), "vanilla:LoadPlayerState:$7E:0E20");
    }

    #[test]
    fn routine_identity_falls_back_to_start_line() {
        let segment = record(SegmentKind::Routine, "LoadPlayerState");
        assert_eq!(segment.identity(), "vanilla:LoadPlayerState:L10");
    }

    #[test]
    fn block_identity_keys_on_file_kind_and_name() {
        let mut segment = record(SegmentKind::Method, "Update");
        segment.file_path = "src/app/emu/cpu.cc".to_string();
        assert_eq!(segment.identity(), "src/app/emu/cpu.cc:method:Update");
    }

    #[test]
    fn section_identity_keys_on_file_stem() {
        let mut segment = record(SegmentKind::Section, "Bank Allocation");
        segment.file_path = "docs/hooks.md".to_string();
        assert_eq!(segment.identity(), "vanilla:hooks:Bank Allocation");
    }

    #[test]
    fn metadata_builder() {
        let metadata = SegmentMetadata::new(SegmentKind::Method, "Update")
            .signature("void Cpu::Update()")
            .parent_scope("Cpu");
        assert_eq!(metadata.signature.as_deref(), Some("void Cpu::Update()"));
        assert_eq!(metadata.parent_scope.as_deref(), Some("Cpu"));
    }

    #[test]
    fn records_serialize_with_flat_field_names() {
        let mut segment = record(SegmentKind::Routine, "Foo");
        segment.metadata.numeric_refs.insert("$7E:0E20".to_string());

        let json = serde_json::to_value(&segment).expect("serialize");
        assert_eq!(json["collection"], "vanilla");
        assert_eq!(json["metadata"]["kind"], "Routine");
        assert_eq!(json["metadata"]["numeric_refs"][0], "$7E:0E20");
    }

    #[test]
    fn section_is_not_callable() {
        assert!(SegmentKind::Routine.is_callable());
        assert!(SegmentKind::Function.is_callable());
        assert!(!SegmentKind::Section.is_callable());
    }
}
