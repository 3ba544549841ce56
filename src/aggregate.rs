//! Dominant Emotion Aggregation
//!
//! Reduces a buffer of labels to one dominant label. The buffer is treated
//! as a multiset for counting, plus first-appearance order for tie-breaking,
//! so out-of-order classification arrivals never change the result for the
//! same sequence of appends.

use crate::emotion::EmotionLabel;

/// The most frequent label in the buffer
///
/// Ties between equally-frequent labels resolve to the one that first
/// appeared earliest in the buffer, making the result a pure function of
/// the append sequence. An empty buffer yields [`EmotionLabel::Neutral`].
#[must_use]
pub fn dominant(labels: &[EmotionLabel]) -> EmotionLabel {
    // Counts in first-appearance order.
    let mut counts: Vec<(EmotionLabel, usize)> = Vec::new();

    for &label in labels {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    // Keep the first strict maximum; an equal count never displaces an
    // earlier-appearing label.
    counts
        .into_iter()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map_or(EmotionLabel::Neutral, |(label, _)| label)
}
