//! Task profiles: weighted signal rules plus a retention policy.
//!
//! A profile describes what makes a segment worth keeping for one generation
//! task. Signals are cheap textual predicates evaluated against a precomputed
//! [`ScoreContext`], so scoring a large corpus stays a single pass per
//! segment.

use crate::error::{CurationError, Result};
use corpus_segmenter::SegmentRecord;
use regex::Regex;

/// Lowercased views of a segment, computed once before rule evaluation
#[derive(Debug)]
pub struct ScoreContext {
    /// Full segment text, lowercased
    pub text_lower: String,
    /// Segment name, lowercased
    pub name_lower: String,
    /// Original (case-preserving) segment name
    pub name: String,
    /// Number of lines in the segment
    pub line_count: usize,
}

impl ScoreContext {
    /// Build the context for one segment
    #[must_use]
    pub fn from_segment(segment: &SegmentRecord) -> Self {
        Self {
            text_lower: segment.raw_text.to_lowercase(),
            name_lower: segment.metadata.name.to_lowercase(),
            name: segment.metadata.name.clone(),
            line_count: segment.line_count(),
        }
    }

    fn head(&self, lines: usize) -> String {
        self.text_lower
            .lines()
            .take(lines)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single relevance predicate.
///
/// Needle matching is substring-based on the lowercased text, so needles
/// should be given lowercased. Name patterns run against the original name to
/// keep case-sensitive checks (CamelCase detection) possible.
#[derive(Debug, Clone)]
pub enum Signal {
    /// Text contains at least one of the needles
    TextContainsAny(Vec<String>),
    /// Text contains none of the needles
    TextLacksAll(Vec<String>),
    /// Name contains at least one of the needles
    NameContainsAny(Vec<String>),
    /// Name does not start with the prefix
    NameLacksPrefix(String),
    /// Original-case name matches the pattern
    NameMatches(Regex),
    /// Line count falls within the inclusive range
    LineCountBetween(usize, usize),
    /// Occurrences of all needles combined reach the threshold
    TextCountAtLeast { needles: Vec<String>, count: usize },
    /// First `lines` lines contain at least one of the needles
    HeadContainsAny { lines: usize, needles: Vec<String> },
    /// Every inner signal matches
    AllOf(Vec<Signal>),
}

impl Signal {
    /// Evaluate this signal against a precomputed context
    #[must_use]
    pub fn matches(&self, ctx: &ScoreContext) -> bool {
        match self {
            Self::TextContainsAny(needles) => {
                needles.iter().any(|n| ctx.text_lower.contains(n.as_str()))
            }
            Self::TextLacksAll(needles) => {
                !needles.iter().any(|n| ctx.text_lower.contains(n.as_str()))
            }
            Self::NameContainsAny(needles) => {
                needles.iter().any(|n| ctx.name_lower.contains(n.as_str()))
            }
            Self::NameLacksPrefix(prefix) => !ctx.name_lower.starts_with(prefix.as_str()),
            Self::NameMatches(pattern) => pattern.is_match(&ctx.name),
            Self::LineCountBetween(lo, hi) => ctx.line_count >= *lo && ctx.line_count <= *hi,
            Self::TextCountAtLeast { needles, count } => {
                let total: usize = needles
                    .iter()
                    .map(|n| ctx.text_lower.matches(n.as_str()).count())
                    .sum();
                total >= *count
            }
            Self::HeadContainsAny { lines, needles } => {
                let head = ctx.head(*lines);
                needles.iter().any(|n| head.contains(n.as_str()))
            }
            Self::AllOf(signals) => signals.iter().all(|s| s.matches(ctx)),
        }
    }
}

/// A signal with the score it contributes when it matches
#[derive(Debug, Clone)]
pub struct SignalRule {
    pub signal: Signal,
    pub weight: i64,
}

impl SignalRule {
    #[must_use]
    pub const fn new(signal: Signal, weight: i64) -> Self {
        Self { signal, weight }
    }
}

/// A named scoring profile with its retention policy.
///
/// `retain_fraction` is the share of the sorted corpus kept after scoring;
/// `floor_count` guards small corpora so a task never starves for input.
#[derive(Debug, Clone)]
pub struct TaskProfile {
    pub name: String,
    pub rules: Vec<SignalRule>,
    pub retain_fraction: f64,
    pub floor_count: usize,
}

impl TaskProfile {
    /// Create a profile, validating the retention fraction
    pub fn new(
        name: impl Into<String>,
        rules: Vec<SignalRule>,
        retain_fraction: f64,
        floor_count: usize,
    ) -> Result<Self> {
        if !(retain_fraction > 0.0 && retain_fraction <= 1.0) {
            return Err(CurationError::invalid_profile(format!(
                "retain_fraction must be in (0, 1], got {retain_fraction}"
            )));
        }
        Ok(Self {
            name: name.into(),
            rules,
            retain_fraction,
            floor_count,
        })
    }

    /// Look up a built-in profile by name
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(Self::debug()),
            "optimize" => Some(Self::optimize()),
            "hook" => Some(Self::hook()),
            "documentation" => Some(Self::documentation()),
            _ => None,
        }
    }

    /// Routines suited to debugging scenarios: complex control flow, stack
    /// traffic, hardware register access
    #[must_use]
    pub fn debug() -> Self {
        Self {
            name: "debug".to_string(),
            rules: vec![
                SignalRule::new(
                    Signal::TextContainsAny(strings(&[
                        "beq", "bne", "bcc", "bcs", "bpl", "bmi",
                    ])),
                    2,
                ),
                SignalRule::new(Signal::TextContainsAny(strings(&["jsr", "jsl"])), 1),
                SignalRule::new(
                    Signal::TextContainsAny(strings(&["pha", "pla", "phx", "plx", "php", "plp"])),
                    3,
                ),
                SignalRule::new(
                    Signal::TextContainsAny(strings(&["$21", "$42", "$43"])),
                    2,
                ),
                SignalRule::new(
                    Signal::AllOf(vec![
                        Signal::TextContainsAny(strings(&["("])),
                        Signal::TextContainsAny(strings(&[")"])),
                    ]),
                    2,
                ),
                SignalRule::new(Signal::NameContainsAny(strings(&["loop", "wait"])), 2),
            ],
            retain_fraction: 0.70,
            floor_count: 100,
        }
    }

    /// Routines with optimization headroom: hot names, loops, wide
    /// addressing, mode switches
    #[must_use]
    pub fn optimize() -> Self {
        Self {
            name: "optimize".to_string(),
            rules: vec![
                SignalRule::new(
                    Signal::NameContainsAny(strings(&[
                        "update", "draw", "tick", "main", "loop", "frame",
                    ])),
                    3,
                ),
                SignalRule::new(
                    Signal::AllOf(vec![
                        Signal::TextContainsAny(strings(&[
                            "dex", "dey", "inx", "iny", "dec", "inc",
                        ])),
                        Signal::TextContainsAny(strings(&["bne", "beq", "bpl", "bmi"])),
                    ]),
                    3,
                ),
                SignalRule::new(
                    Signal::AllOf(vec![
                        Signal::TextContainsAny(strings(&[".w $"])),
                        Signal::TextLacksAll(strings(&[".b $"])),
                    ]),
                    2,
                ),
                SignalRule::new(
                    Signal::TextCountAtLeast {
                        needles: strings(&["lda", "sta"]),
                        count: 6,
                    },
                    2,
                ),
                SignalRule::new(Signal::TextContainsAny(strings(&["rep #", "sep #"])), 1),
                SignalRule::new(Signal::LineCountBetween(11, usize::MAX), 1),
            ],
            retain_fraction: 0.70,
            floor_count: 100,
        }
    }

    /// Routines worth hooking: event-shaped names, clean entry points,
    /// WRAM writes
    #[must_use]
    pub fn hook() -> Self {
        Self {
            name: "hook".to_string(),
            rules: vec![
                SignalRule::new(
                    Signal::NameContainsAny(strings(&[
                        "collect",
                        "pickup",
                        "trigger",
                        "event",
                        "enter",
                        "exit",
                        "damage",
                        "heal",
                        "spawn",
                        "death",
                        "transition",
                        "load",
                        "init",
                        "setup",
                        "handle",
                        "process",
                        "check",
                    ])),
                    4,
                ),
                SignalRule::new(
                    Signal::HeadContainsAny {
                        lines: 3,
                        needles: strings(&["lda", "ldx", "ldy", "php", "pha"]),
                    },
                    2,
                ),
                SignalRule::new(
                    Signal::AllOf(vec![
                        Signal::TextContainsAny(strings(&["sta"])),
                        Signal::TextContainsAny(strings(&["$7e", "$7f"])),
                    ]),
                    2,
                ),
                SignalRule::new(Signal::TextContainsAny(strings(&["jsr", "jsl"])), 1),
                SignalRule::new(Signal::LineCountBetween(6, usize::MAX), 1),
                SignalRule::new(Signal::LineCountBetween(0, 49), 1),
            ],
            retain_fraction: 0.60,
            floor_count: 100,
        }
    }

    /// Routines worth documenting: meaningful names, recognizable game
    /// features, moderate size
    #[must_use]
    pub fn documentation() -> Self {
        Self {
            name: "documentation".to_string(),
            rules: vec![
                SignalRule::new(
                    Signal::AllOf(vec![
                        Signal::NameLacksPrefix("sub_".to_string()),
                        Signal::NameLacksPrefix("loc_".to_string()),
                    ]),
                    2,
                ),
                // Underscore anywhere, or an uppercase letter past the first
                // character; either suggests a hand-named routine
                SignalRule::new(
                    Signal::NameMatches(
                        Regex::new(r"_|.[A-Z]").expect("name shape pattern is valid"),
                    ),
                    1,
                ),
                SignalRule::new(
                    Signal::NameContainsAny(strings(&[
                        "player",
                        "link",
                        "enemy",
                        "sprite",
                        "item",
                        "menu",
                        "dialog",
                        "chest",
                        "door",
                        "switch",
                        "dungeon",
                        "overworld",
                        "music",
                        "sound",
                        "graphics",
                        "palette",
                        "animation",
                        "collision",
                        "physics",
                        "movement",
                        "inventory",
                        "save",
                    ])),
                    3,
                ),
                SignalRule::new(Signal::LineCountBetween(5, 40), 2),
                SignalRule::new(Signal::LineCountBetween(41, 80), 1),
                SignalRule::new(Signal::TextContainsAny(strings(&[";"])), 1),
                SignalRule::new(Signal::TextContainsAny(strings(&["$7e", "$7f"])), 1),
            ],
            retain_fraction: 0.75,
            floor_count: 100,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_segmenter::{SegmentKind, SegmentMetadata};
    use pretty_assertions::assert_eq;

    fn segment(name: &str, text: &str) -> SegmentRecord {
        SegmentRecord::new(
            "vanilla".to_string(),
            "bank_00.asm".to_string(),
            1,
            text.lines().count().max(1),
            text.to_string(),
            SegmentMetadata::new(SegmentKind::Routine, name),
        )
    }

    #[test]
    fn text_contains_any_is_case_insensitive_via_context() {
        let ctx = ScoreContext::from_segment(&segment("Foo", "  LDA.w $0E20\n  BNE Skip"));
        assert!(Signal::TextContainsAny(strings(&["bne"])).matches(&ctx));
        assert!(!Signal::TextContainsAny(strings(&["rts"])).matches(&ctx));
    }

    #[test]
    fn line_count_between_is_inclusive() {
        let ctx = ScoreContext::from_segment(&segment("Foo", "a\nb\nc\nd\ne"));
        assert!(Signal::LineCountBetween(5, 40).matches(&ctx));
        assert!(Signal::LineCountBetween(1, 5).matches(&ctx));
        assert!(!Signal::LineCountBetween(6, 40).matches(&ctx));
    }

    #[test]
    fn text_count_at_least_sums_across_needles() {
        let ctx = ScoreContext::from_segment(&segment(
            "Foo",
            "lda #$00\nsta $10\nlda #$01\nsta $11\nlda #$02\nsta $12",
        ));
        assert!(Signal::TextCountAtLeast {
            needles: strings(&["lda", "sta"]),
            count: 6
        }
        .matches(&ctx));
        assert!(!Signal::TextCountAtLeast {
            needles: strings(&["lda", "sta"]),
            count: 7
        }
        .matches(&ctx));
    }

    #[test]
    fn head_contains_any_only_sees_the_first_lines() {
        let ctx = ScoreContext::from_segment(&segment("Foo", "Label:\n  NOP\n  NOP\n  LDA #$00"));
        let signal = Signal::HeadContainsAny {
            lines: 3,
            needles: strings(&["lda"]),
        };
        assert!(!signal.matches(&ctx));

        let ctx = ScoreContext::from_segment(&segment("Foo", "Label:\n  LDA #$00\n  RTS"));
        assert!(signal.matches(&ctx));
    }

    #[test]
    fn name_matches_detects_hand_named_routines() {
        let pattern = Regex::new(r"_|.[A-Z]").expect("pattern");
        let named = ScoreContext::from_segment(&segment("LoadPlayerState", ""));
        let generated = ScoreContext::from_segment(&segment("Sub82fa", ""));
        assert!(Signal::NameMatches(pattern.clone()).matches(&named));
        assert!(!Signal::NameMatches(pattern).matches(&generated));
    }

    #[test]
    fn builtin_lookup_covers_all_four_tasks() {
        for name in ["debug", "optimize", "hook", "documentation"] {
            let profile = TaskProfile::builtin(name).expect("builtin profile");
            assert_eq!(profile.name, name);
            assert!(profile.retain_fraction >= 0.60 && profile.retain_fraction <= 0.75);
            assert_eq!(profile.floor_count, 100);
            assert!(!profile.rules.is_empty());
        }
        assert!(TaskProfile::builtin("unknown").is_none());
    }

    #[test]
    fn retain_fraction_is_validated() {
        assert!(TaskProfile::new("t", Vec::new(), 0.0, 10).is_err());
        assert!(TaskProfile::new("t", Vec::new(), 1.5, 10).is_err());
        assert!(TaskProfile::new("t", Vec::new(), 1.0, 10).is_ok());
    }
}
