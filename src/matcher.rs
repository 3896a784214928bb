//! Sentence-level goal matching.

use crate::annotate::{Document, Sentence};
use crate::catalog::GoalQuery;
use std::collections::HashSet;

/// Index of the first sentence that qualifies for `query`, if any.
///
/// Later qualifying sentences are ignored on purpose: the first mention is the
/// anchor that window derivation builds on, and scanning past it would only
/// move summaries away from where a goal is introduced.
pub fn first_match(
    doc: &Document,
    query: &GoalQuery,
    max_sentence_tokens: usize,
) -> Option<usize> {
    doc.sentences
        .iter()
        .position(|sentence| qualifies(sentence, query, max_sentence_tokens))
}

/// Whether one sentence satisfies all four match conditions: every required
/// term present, at least one optional term present, no stopper present, and
/// strictly fewer than `max_sentence_tokens` tokens (punctuation included).
///
/// Terms compare against the normalized token form, so stop-word and
/// punctuation flags never disqualify a term hit.
pub fn qualifies(sentence: &Sentence, query: &GoalQuery, max_sentence_tokens: usize) -> bool {
    if sentence.tokens.len() >= max_sentence_tokens {
        return false;
    }
    let present: HashSet<&str> = sentence
        .tokens
        .iter()
        .map(|t| t.normalized.as_str())
        .collect();
    let all_required = query
        .required
        .iter()
        .all(|term| present.contains(term.as_str()));
    let any_optional = query
        .optional
        .iter()
        .any(|term| present.contains(term.as_str()));
    let no_stoppers = !query
        .stoppers
        .iter()
        .any(|term| present.contains(term.as_str()));
    all_required && any_optional && no_stoppers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{PartOfSpeech, Token};

    fn word(text: &str) -> Token {
        Token {
            text: text.to_string(),
            normalized: text.to_lowercase(),
            pos: PartOfSpeech::Noun,
            is_stopword: false,
            is_punctuation: false,
        }
    }

    fn sentence(words: &[&str]) -> Sentence {
        Sentence {
            text: words.join(" "),
            tokens: words.iter().map(|w| word(w)).collect(),
        }
    }

    fn doc(sentences: Vec<Sentence>) -> Document {
        Document { sentences }
    }

    fn query(required: &[&str], optional: &[&str], stoppers: &[&str]) -> GoalQuery {
        GoalQuery {
            goal_id: 1,
            required: required.iter().map(|s| s.to_string()).collect(),
            optional: optional.iter().map(|s| s.to_string()).collect(),
            stoppers: stoppers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let d = doc(vec![
            sentence(&["nothing", "here"]),
            sentence(&["still", "nothing"]),
            sentence(&["poverty", "end"]),
            sentence(&["filler"]),
            sentence(&["filler"]),
            sentence(&["poverty", "end"]),
        ]);
        let q = query(&["poverty"], &["end"], &[]);
        assert_eq!(first_match(&d, &q, 100), Some(2));
    }

    #[test]
    fn test_all_required_terms_must_be_present() {
        let d = doc(vec![sentence(&["poverty", "end"])]);
        let q = query(&["poverty", "extreme"], &["end"], &[]);
        assert_eq!(first_match(&d, &q, 100), None);
    }

    #[test]
    fn test_at_least_one_optional_term_required() {
        let d = doc(vec![sentence(&["poverty", "report"])]);
        let q = query(&["poverty"], &["end", "eradicate"], &[]);
        assert_eq!(first_match(&d, &q, 100), None);
    }

    #[test]
    fn test_empty_optional_set_never_matches() {
        let d = doc(vec![sentence(&["poverty", "end"])]);
        let q = query(&["poverty"], &[], &[]);
        assert_eq!(first_match(&d, &q, 100), None);
    }

    #[test]
    fn test_stopper_vetoes_otherwise_qualifying_sentence() {
        let d = doc(vec![
            sentence(&["poverty", "end", "hunger"]),
            sentence(&["poverty", "end"]),
        ]);
        let q = query(&["poverty"], &["end"], &["hunger"]);
        assert_eq!(first_match(&d, &q, 100), Some(1));
    }

    #[test]
    fn test_token_budget_excludes_long_sentences() {
        let mut long_words = vec!["poverty", "end"];
        long_words.resize(100, "filler");
        let d = doc(vec![sentence(&long_words), sentence(&["poverty", "end"])]);
        let q = query(&["poverty"], &["end"], &[]);
        assert_eq!(first_match(&d, &q, 100), Some(1));

        let mut just_under = vec!["poverty", "end"];
        just_under.resize(99, "filler");
        let d = doc(vec![sentence(&just_under)]);
        assert_eq!(first_match(&d, &q, 100), Some(0));
    }

    #[test]
    fn test_matching_ignores_stopword_and_punctuation_flags() {
        let mut flagged = word("poverty");
        flagged.is_stopword = true;
        let d = doc(vec![Sentence {
            text: "poverty end".to_string(),
            tokens: vec![flagged, word("end")],
        }]);
        let q = query(&["poverty"], &["end"], &[]);
        assert_eq!(first_match(&d, &q, 100), Some(0));
    }

    #[test]
    fn test_terms_match_normalized_form() {
        let d = doc(vec![Sentence {
            text: "Poverty End".to_string(),
            tokens: vec![word("Poverty"), word("End")],
        }]);
        let q = query(&["poverty"], &["end"], &[]);
        assert_eq!(first_match(&d, &q, 100), Some(0));
    }

    #[test]
    fn test_first_match_is_deterministic() {
        let d = doc(vec![
            sentence(&["filler"]),
            sentence(&["poverty", "end"]),
            sentence(&["poverty", "end"]),
        ]);
        let q = query(&["poverty"], &["end"], &[]);
        assert_eq!(first_match(&d, &q, 100), first_match(&d, &q, 100));
    }

    #[test]
    fn test_empty_document_matches_nothing() {
        let q = query(&["poverty"], &["end"], &[]);
        assert_eq!(first_match(&doc(vec![]), &q, 100), None);
    }
}
