//! Relevance scoring and retention selection.

use crate::profile::{ScoreContext, TaskProfile};
use corpus_segmenter::SegmentRecord;

/// Score one segment against a profile.
///
/// The score is the sum of the weights of every matching rule. Weights can be
/// negative, so a profile may penalize as well as reward.
#[must_use]
pub fn score(segment: &SegmentRecord, profile: &TaskProfile) -> i64 {
    let ctx = ScoreContext::from_segment(segment);
    profile
        .rules
        .iter()
        .filter(|rule| rule.signal.matches(&ctx))
        .map(|rule| rule.weight)
        .sum()
}

/// Keep the segments most relevant to a profile's task.
///
/// Segments are sorted by descending score with a stable sort, so equal
/// scores keep their input order and the selection is deterministic. The
/// retained count is `retain_fraction` of the corpus, raised to
/// `floor_count` so small corpora pass through intact, and capped at the
/// corpus size.
#[must_use]
pub fn select(segments: Vec<SegmentRecord>, profile: &TaskProfile) -> Vec<SegmentRecord> {
    let total = segments.len();
    if total == 0 {
        return segments;
    }

    let mut scored: Vec<(i64, SegmentRecord)> = segments
        .into_iter()
        .map(|segment| (score(&segment, profile), segment))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let cutoff = (total as f64 * profile.retain_fraction) as usize;
    let keep = cutoff.max(profile.floor_count).min(total);

    log::debug!(
        "Profile {} retained {keep} of {total} segments",
        profile.name
    );

    scored
        .into_iter()
        .take(keep)
        .map(|(_, segment)| segment)
        .collect()
}
