use crate::error::{Result, SegmenterError};
use serde::{Deserialize, Serialize};

/// Configuration for boundary scanning behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Minimum line count for line-oriented segments (shorter routines carry
    /// no teachable content)
    pub min_segment_lines: usize,

    /// Minimum character count for block segments (shorter matches are
    /// usually bare declarations)
    pub min_segment_chars: usize,

    /// Minimum body character count for documentation sections
    pub min_section_chars: usize,

    /// Maximum line count per routine before the scan force-closes it
    pub max_routine_lines: usize,

    /// Close routines at the first return mnemonic (RTS/RTL/RTI) instead of
    /// waiting for a blank line or the next label
    pub stop_at_return: bool,

    /// How many lines above a declaration to search for a block-comment opener
    pub block_comment_lookback: usize,

    /// How many lines after a declaration to search for its opening brace
    pub declaration_lookahead: usize,

    /// Override for the dialect's line-comment marker
    pub comment_marker: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_segment_lines: 5,
            min_segment_chars: 50,
            min_section_chars: 200,
            max_routine_lines: 100,
            stop_at_return: false,
            block_comment_lookback: 20,
            declaration_lookahead: 5,
            comment_marker: None,
        }
    }
}

impl ScanConfig {
    /// Config for raw bank dumps where routines end at an explicit return
    pub fn for_bank_dump() -> Self {
        Self {
            stop_at_return: true,
            ..Default::default()
        }
    }

    /// Config for documentation trees with short tutorial sections
    pub fn for_docs() -> Self {
        Self {
            min_section_chars: 80,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_routine_lines == 0 {
            return Err(SegmenterError::invalid_config(
                "max_routine_lines must be > 0",
            ));
        }

        if self.min_segment_lines > self.max_routine_lines {
            return Err(SegmenterError::invalid_config(format!(
                "min_segment_lines ({}) cannot exceed max_routine_lines ({})",
                self.min_segment_lines, self.max_routine_lines
            )));
        }

        Ok(())
    }
}
