//! # Corpus Curation
//!
//! Relevance scoring and prompt-template rotation for mined segment corpora.
//!
//! ## Philosophy
//!
//! Not every extracted segment suits every generation task. Curation layers
//! two filters on top of extraction:
//! - Task profiles score each segment with cheap weighted signals and keep
//!   the most relevant fraction, never starving a task below its floor
//! - Template rotation spreads prompt phrasing evenly across a catalog so
//!   generated samples stay diverse
//!
//! ## Architecture
//!
//! ```text
//! SegmentRecord[]
//!     │
//!     ├──> Task Profile (debug / optimize / hook / documentation)
//!     │    ├─> Signal rules score each segment
//!     │    └─> Stable sort, retain top fraction (floor-guarded)
//!     │
//!     └──> Template Rotator
//!          ├─> Least-used template, random tie-break
//!          └─> Render with per-segment placeholder values
//! ```
//!
//! ## Example
//!
//! ```rust
//! use corpus_curation::{select, TaskProfile, TemplateRotator};
//!
//! let profile = TaskProfile::debug();
//! let segments = Vec::new(); // from corpus_segmenter
//! let kept = select(segments, &profile);
//!
//! let rotator = TemplateRotator::from_builtin("asm").unwrap();
//! let template = rotator.next();
//! let prompt = template.render(&[("feature", "a VBlank wait loop")]);
//! assert!(!prompt.is_empty());
//! # let _ = kept;
//! ```

mod error;
mod profile;
mod rotator;
mod scorer;
mod templates;

pub use error::{CurationError, Result};
pub use profile::{ScoreContext, Signal, SignalRule, TaskProfile};
pub use rotator::{RotatorStats, TemplateRotator};
pub use scorer::{score, select};
pub use templates::{builtin_catalog, catalog_from_toml_str, PromptTemplate};
