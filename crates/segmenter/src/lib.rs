//! # Corpus Segmenter
//!
//! Boundary detection and metadata extraction for ROM-hacking source corpora.
//!
//! ## Philosophy
//!
//! The segmenter carves heterogeneous sources into self-contained units that:
//! - Respect the structural idiom of each dialect (labels, braces, headings)
//! - Collect comments, address literals and call targets in the same pass
//! - Produce stable identity keys so re-scans are idempotent
//! - Stay deterministic: same input and config, same segments
//!
//! ## Architecture
//!
//! ```text
//! Source File
//!     │
//!     ├──> Dialect Detection (from extension)
//!     │
//!     ├──> Boundary Scan
//!     │    ├─> Assembly: label-anchored line scan
//!     │    ├─> C++:      brace-balanced block scan
//!     │    └─> Markdown: heading-delimited section scan
//!     │
//!     └──> SegmentRecord[] with metadata
//!          (comments, $BB:AAAA refs, call targets, hierarchy)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use corpus_segmenter::{ScanConfig, Segmenter, SourceDialect};
//!
//! let segmenter = Segmenter::new(ScanConfig::default()).unwrap();
//!
//! let bank = "\
//! LoadPlayerState:
//!     LDA.w $0E20 ; player state
//!     JSR ApplyState
//!     STA.l $7E:0E22
//!     RTS
//! ";
//!
//! let segments = segmenter
//!     .extract(bank, "bank_00.asm", "vanilla", SourceDialect::Assembly)
//!     .unwrap();
//! for segment in segments {
//!     println!(
//!         "{} at lines {}-{}",
//!         segment.metadata.name, segment.start_line, segment.end_line
//!     );
//! }
//! ```

mod block_scan;
mod config;
mod corpus;
mod dialect;
mod error;
mod label_scan;
mod metadata;
mod scanner;
mod section_scan;
mod types;

pub use config::ScanConfig;
pub use corpus::CorpusScanner;
pub use dialect::SourceDialect;
pub use error::{Result, SegmenterError};
pub use scanner::Segmenter;
pub use types::{SegmentKind, SegmentMetadata, SegmentRecord};
