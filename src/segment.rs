//! Discussion windows: from match positions to sentence ranges.

use crate::annotate::{Document, Sentence};

/// A goal's discussion region, as sentence indices `start..=end`.
///
/// Both bounds are inclusive, so a window capped by the adjacent goal's
/// match still covers that boundary sentence. `end` is a logical bound and
/// may point past the document; selection clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalWindow {
    pub goal_id: u8,
    pub start: usize,
    pub end: usize,
}

/// Derive a window for every located goal, in goal order.
///
/// A window runs from the goal's own match position to the adjacent goal's
/// match position when that lies strictly past the start. In every other case
/// (adjacent goal absent, matched at or before the start, or no adjacent goal
/// at all, as for the final one) the window runs `span` sentences past the
/// start instead. Only the directly adjacent goal bounds a window; a later
/// goal's position never does.
pub fn derive_windows(positions: &[Option<usize>], span: usize) -> Vec<GoalWindow> {
    let mut windows = Vec::new();
    for (i, position) in positions.iter().enumerate() {
        let Some(start) = *position else { continue };
        let end = match positions.get(i + 1).copied().flatten() {
            Some(next) if next > start => next,
            _ => start + span,
        };
        windows.push(GoalWindow {
            goal_id: (i + 1) as u8,
            start,
            end,
        });
    }
    windows
}

/// The window's sentences, both bounds inclusive, clamped to the document
pub fn select<'a>(doc: &'a Document, window: &GoalWindow) -> &'a [Sentence] {
    let start = window.start.min(doc.len());
    let end = window.end.saturating_add(1).min(doc.len()).max(start);
    &doc.sentences[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{PartOfSpeech, Token};

    fn doc_of(n: usize) -> Document {
        let sentences = (0..n)
            .map(|i| {
                let text = format!("s{i}");
                Sentence {
                    tokens: vec![Token {
                        text: text.clone(),
                        normalized: text.clone(),
                        pos: PartOfSpeech::Noun,
                        is_stopword: false,
                        is_punctuation: false,
                    }],
                    text,
                }
            })
            .collect();
        Document { sentences }
    }

    fn positions(entries: &[(usize, usize)]) -> Vec<Option<usize>> {
        // (goal index, sentence index) pairs over a 17-slot table
        let mut table = vec![None; 17];
        for (goal_index, sentence_index) in entries {
            table[*goal_index] = Some(*sentence_index);
        }
        table
    }

    #[test]
    fn test_adjacent_match_bounds_window() {
        let windows = derive_windows(&positions(&[(0, 5), (1, 12)]), 50);
        assert_eq!(
            windows[0],
            GoalWindow {
                goal_id: 1,
                start: 5,
                end: 12
            }
        );
        assert_eq!(
            windows[1],
            GoalWindow {
                goal_id: 2,
                start: 12,
                end: 62
            }
        );
    }

    #[test]
    fn test_span_fallback_when_no_later_match() {
        let windows = derive_windows(&positions(&[(0, 5)]), 50);
        assert_eq!(windows.len(), 1);
        assert_eq!(
            windows[0],
            GoalWindow {
                goal_id: 1,
                start: 5,
                end: 55
            }
        );
    }

    #[test]
    fn test_only_directly_adjacent_goal_bounds() {
        // Goal 2 is absent, so goal 3's position does not cap goal 1
        let windows = derive_windows(&positions(&[(0, 10), (2, 12)]), 50);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].end, 60);
        assert_eq!(windows[1].goal_id, 3);
        assert_eq!(windows[1].end, 62);
    }

    #[test]
    fn test_adjacent_match_at_or_before_start_falls_back() {
        let same = derive_windows(&positions(&[(0, 4), (1, 4)]), 50);
        assert_eq!(same[0].end, 54);

        let earlier = derive_windows(&positions(&[(0, 9), (1, 3)]), 50);
        assert_eq!(earlier[0].end, 59);
        assert_eq!(earlier[1].start, 3);
    }

    #[test]
    fn test_absent_goals_get_no_window() {
        let windows = derive_windows(&positions(&[(4, 7)]), 50);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].goal_id, 5);
    }

    #[test]
    fn test_final_goal_always_uses_span_fallback() {
        let table: Vec<Option<usize>> = (0..17).map(Some).collect();
        let windows = derive_windows(&table, 50);
        assert_eq!(windows.len(), 17);
        assert_eq!(windows[16].goal_id, 17);
        assert_eq!(windows[16].start, 16);
        assert_eq!(windows[16].end, 66);
        // In-between goals are bounded by their neighbors
        assert_eq!(windows[5].end, 6);
    }

    #[test]
    fn test_select_covers_both_bounds() {
        let doc = doc_of(20);
        let window = GoalWindow {
            goal_id: 1,
            start: 5,
            end: 12,
        };
        let picked = select(&doc, &window);
        assert_eq!(picked.len(), 8);
        assert_eq!(picked[0].text, "s5");
        assert_eq!(picked[7].text, "s12");
    }

    #[test]
    fn test_select_clamps_to_document() {
        let doc = doc_of(8);
        let window = GoalWindow {
            goal_id: 1,
            start: 5,
            end: 55,
        };
        let picked = select(&doc, &window);
        assert_eq!(picked.len(), 3);
        assert_eq!(picked[2].text, "s7");

        let out_of_range = GoalWindow {
            goal_id: 1,
            start: 9,
            end: 59,
        };
        assert!(select(&doc, &out_of_range).is_empty());
    }
}
