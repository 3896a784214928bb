//! Locating where each goal's discussion starts.

use crate::annotate::Document;
use crate::catalog::Catalog;
use crate::matcher;
use tracing::debug;

/// First qualifying sentence index for every goal, in goal order.
///
/// Entry `i` belongs to goal `i + 1`; `None` means the document never
/// discusses that goal. Goals are matched independently, so one goal's
/// absence never shifts another's position.
pub fn locate_all(
    doc: &Document,
    catalog: &Catalog,
    max_sentence_tokens: usize,
) -> Vec<Option<usize>> {
    let positions: Vec<Option<usize>> = catalog
        .entries()
        .iter()
        .map(|query| matcher::first_match(doc, query, max_sentence_tokens))
        .collect();

    let found = positions.iter().filter(|p| p.is_some()).count();
    debug!("Located {} of {} goals", found, positions.len());
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::lexicon::LexiconAnnotator;
    use crate::catalog::GOAL_COUNT;

    fn annotate(text: &str) -> Document {
        LexiconAnnotator::new().annotate_text(text)
    }

    #[test]
    fn test_positions_align_with_goal_order() {
        let doc = annotate(
            "The region is stable. \
             Leaders pledged to end extreme poverty this decade. \
             Another topic entirely. \
             Malnutrition and hunger call for better food policy.",
        );
        let positions = locate_all(&doc, Catalog::global(), 100);

        assert_eq!(positions.len(), GOAL_COUNT as usize);
        assert_eq!(positions[0], Some(1));
        assert_eq!(positions[1], Some(3));
        for (i, position) in positions.iter().enumerate() {
            if i != 0 && i != 1 {
                assert_eq!(*position, None, "goal {}", i + 1);
            }
        }
    }

    #[test]
    fn test_goals_are_independent() {
        // Removing goal 1's sentence must not move goal 2's position
        let with_both = annotate(
            "Leaders pledged to end extreme poverty. \
             Malnutrition and hunger call for better food policy.",
        );
        let without_first =
            annotate("Malnutrition and hunger call for better food policy.");

        let both = locate_all(&with_both, Catalog::global(), 100);
        let single = locate_all(&without_first, Catalog::global(), 100);

        assert_eq!(both[0], Some(0));
        assert_eq!(both[1], Some(1));
        assert_eq!(single[0], None);
        assert_eq!(single[1], Some(0));
    }

    #[test]
    fn test_empty_document_locates_nothing() {
        let positions = locate_all(&annotate(""), Catalog::global(), 100);
        assert_eq!(positions.len(), GOAL_COUNT as usize);
        assert!(positions.iter().all(|p| p.is_none()));
    }
}
