//! Overlap resolution across extraction candidates

use piiveil_domain::Entity;

/// Resolve overlapping candidates into an ordered, non-overlapping sequence.
///
/// Candidates are stable-sorted by `(start, end)`, so ties keep extraction
/// order. Scanning left to right, a candidate survives only when it starts at
/// or after the end of the last survivor. The earliest-starting candidate
/// wins an overlap regardless of length.
pub fn merge_entities(mut candidates: Vec<Entity>) -> Vec<Entity> {
    candidates.sort_by_key(|entity| (entity.start, entity.end));

    let mut merged: Vec<Entity> = Vec::with_capacity(candidates.len());
    let mut last_end: Option<usize> = None;

    for candidate in candidates {
        if last_end.map_or(true, |end| candidate.start >= end) {
            last_end = Some(candidate.end);
            merged.push(candidate);
        }
    }

    merged
}
