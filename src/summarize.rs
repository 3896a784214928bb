//! Extractive summarization by keyword frequency.

use crate::annotate::Document;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Pick the `max_sentences` strongest sentences from `doc`, strongest first.
///
/// Keywords are content-tagged tokens that are neither stop-words nor
/// punctuation, keyed by surface form (case-sensitive). Each keyword weighs
/// its occurrence count divided by the count of the most frequent keyword,
/// and a sentence's strength is the sum of weights over its tokens whose
/// surface form is a keyword. Sentences with zero strength never appear;
/// equal strengths keep document order.
pub fn summarize(doc: &Document, max_sentences: usize) -> Vec<String> {
    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for sentence in &doc.sentences {
        for token in &sentence.tokens {
            if token.is_keyword() {
                *frequencies.entry(token.text.as_str()).or_insert(0) += 1;
            }
        }
    }
    if frequencies.is_empty() {
        return Vec::new();
    }
    let max_count = frequencies.values().copied().max().unwrap_or(1) as f64;

    let mut ranked: Vec<(usize, f64)> = Vec::new();
    for (index, sentence) in doc.sentences.iter().enumerate() {
        let strength: f64 = sentence
            .tokens
            .iter()
            .filter_map(|token| frequencies.get(token.text.as_str()))
            .map(|count| *count as f64 / max_count)
            .sum();
        if strength > 0.0 {
            ranked.push((index, strength));
        }
    }

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(max_sentences)
        .map(|(index, _)| doc.sentences[index].text.clone())
        .collect()
}
