// Overlap resolution for matched spans.

use super::matcher::PhraseMatch;

/// Keep the longest non-overlapping spans.
///
/// Longer spans win; among equal lengths the earlier start wins. The result
/// is in document order.
pub fn filter_spans(spans: &[PhraseMatch]) -> Vec<PhraseMatch> {
    let mut by_priority: Vec<PhraseMatch> = spans.to_vec();
    by_priority.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

    let mut taken: Vec<PhraseMatch> = Vec::new();
    for span in by_priority {
        let overlaps = taken
            .iter()
            .any(|t| span.start < t.end && t.start < span.end);
        if !overlaps {
            taken.push(span);
        }
    }
    taken.sort_by_key(|s| s.start);
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> PhraseMatch {
        PhraseMatch {
            pattern: 0,
            start,
            end,
        }
    }

    #[test]
    fn test_longest_wins() {
        let kept = filter_spans(&[span(1, 2), span(0, 3), span(2, 3)]);
        assert_eq!(kept, vec![span(0, 3)]);
    }

    #[test]
    fn test_equal_length_earlier_wins() {
        let kept = filter_spans(&[span(0, 2), span(1, 3), span(4, 5)]);
        assert_eq!(kept, vec![span(0, 2), span(4, 5)]);
    }

    #[test]
    fn test_adjacent_spans_both_kept() {
        let kept = filter_spans(&[span(2, 4), span(0, 2)]);
        assert_eq!(kept, vec![span(0, 2), span(2, 4)]);
    }
}
