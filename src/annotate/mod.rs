//! Linguistic annotation: the document model, text cleanup, and the
//! pluggable providers that turn raw text into tagged sentences.

pub mod lexicon;
pub mod remote;

pub use lexicon::LexiconAnnotator;
pub use remote::RemoteAnnotator;

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

/// Coarse part-of-speech tags, aligned with the Universal Dependencies set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    ProperNoun,
    Noun,
    Verb,
    Auxiliary,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Conjunction,
    Particle,
    Number,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    pub fn as_tag(&self) -> &'static str {
        match self {
            PartOfSpeech::ProperNoun => "PROPN",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Auxiliary => "AUX",
            PartOfSpeech::Adjective => "ADJ",
            PartOfSpeech::Adverb => "ADV",
            PartOfSpeech::Pronoun => "PRON",
            PartOfSpeech::Determiner => "DET",
            PartOfSpeech::Adposition => "ADP",
            PartOfSpeech::Conjunction => "CCONJ",
            PartOfSpeech::Particle => "PART",
            PartOfSpeech::Number => "NUM",
            PartOfSpeech::Punctuation => "PUNCT",
            PartOfSpeech::Other => "X",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "PROPN" => PartOfSpeech::ProperNoun,
            "NOUN" => PartOfSpeech::Noun,
            "VERB" => PartOfSpeech::Verb,
            "AUX" => PartOfSpeech::Auxiliary,
            "ADJ" => PartOfSpeech::Adjective,
            "ADV" => PartOfSpeech::Adverb,
            "PRON" => PartOfSpeech::Pronoun,
            "DET" => PartOfSpeech::Determiner,
            "ADP" => PartOfSpeech::Adposition,
            "CCONJ" | "SCONJ" | "CONJ" => PartOfSpeech::Conjunction,
            "PART" => PartOfSpeech::Particle,
            "NUM" => PartOfSpeech::Number,
            "PUNCT" => PartOfSpeech::Punctuation,
            _ => PartOfSpeech::Other,
        }
    }

    /// Parts of speech that carry topical content
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            PartOfSpeech::ProperNoun
                | PartOfSpeech::Adjective
                | PartOfSpeech::Noun
                | PartOfSpeech::Verb
        )
    }
}

/// A single token with its surface form, matching form, and tag
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Surface form exactly as written
    pub text: String,
    /// Lowercased form used for query matching
    pub normalized: String,
    pub pos: PartOfSpeech,
    pub is_stopword: bool,
    pub is_punctuation: bool,
}

impl Token {
    /// Keywords carry content and are neither stop-words nor punctuation
    pub fn is_keyword(&self) -> bool {
        !self.is_stopword && !self.is_punctuation && self.pos.is_content()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

/// An annotated document: an ordered run of sentences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

static DOT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.]{2,}").expect("valid regex"));
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ]+").expect("valid regex"));
static CID_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"cid:\d+").expect("valid regex"));

/// Normalize raw extracted text before annotation.
///
/// PDF extraction leaves ligatures, dotted leader lines from tables of
/// contents, and `cid:NNN` glyph markers. The replacement order matters:
/// markers become newlines first, then every newline collapses to a space.
pub fn clean(raw: &str) -> String {
    let composed: String = raw.nfkc().collect();
    let s = DOT_RUNS.replace_all(&composed, "");
    let s = SPACE_RUNS.replace_all(&s, " ");
    let s = CID_MARKERS.replace_all(&s, "\n");
    s.replace('\n', " ")
}

/// A provider that turns raw text into a tokenized, tagged document
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<Document>;

    /// Short provider name for logs and the info endpoint
    fn name(&self) -> &'static str;
}

/// Factory function to create the configured annotator
pub fn create_annotator(config: &Config) -> Result<Arc<dyn Annotator>> {
    match config.system.annotator_provider.as_str() {
        "remote" => {
            let url = config.system.annotator_url.clone().ok_or_else(|| {
                anyhow::anyhow!("annotator_provider 'remote' requires annotator_url")
            })?;
            info!("Using remote annotator at {}", url);
            Ok(Arc::new(remote::RemoteAnnotator::new(
                url,
                config.runtime.annotate_timeout_ms,
                config.runtime.annotate_retries,
                config.runtime.retry_delay_ms,
            )?))
        }
        "lexicon" => {
            info!("Using built-in lexicon annotator");
            Ok(Arc::new(lexicon::LexiconAnnotator::new()))
        }
        other => {
            tracing::warn!("Unknown annotator provider '{}', using lexicon", other);
            Ok(Arc::new(lexicon::LexiconAnnotator::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_dotted_leaders() {
        assert_eq!(clean("Contents....... 4"), "Contents 4");
    }

    #[test]
    fn test_clean_replaces_cid_markers() {
        // cid markers become newlines, which then collapse to spaces
        assert_eq!(clean("acid:12b"), "a b");
        assert_eq!(clean("across cid:7 pages"), "across   pages");
    }

    #[test]
    fn test_clean_collapses_spaces_and_newlines() {
        assert_eq!(clean("one   two\nthree"), "one two three");
    }

    #[test]
    fn test_clean_decomposes_ligatures() {
        assert_eq!(clean("e\u{fb03}ciency"), "efficiency");
    }

    #[test]
    fn test_single_period_survives() {
        assert_eq!(clean("End poverty. Fight hunger."), "End poverty. Fight hunger.");
    }

    #[test]
    fn test_pos_tag_round_trip() {
        for pos in [
            PartOfSpeech::ProperNoun,
            PartOfSpeech::Noun,
            PartOfSpeech::Verb,
            PartOfSpeech::Adjective,
            PartOfSpeech::Punctuation,
        ] {
            assert_eq!(PartOfSpeech::from_tag(pos.as_tag()), pos);
        }
        assert_eq!(PartOfSpeech::from_tag("SYM"), PartOfSpeech::Other);
    }

    #[test]
    fn test_keyword_requires_content_pos_and_flags() {
        let keyword = Token {
            text: "poverty".into(),
            normalized: "poverty".into(),
            pos: PartOfSpeech::Noun,
            is_stopword: false,
            is_punctuation: false,
        };
        assert!(keyword.is_keyword());

        let stop = Token {
            is_stopword: true,
            ..keyword.clone()
        };
        assert!(!stop.is_keyword());

        let adverb = Token {
            pos: PartOfSpeech::Adverb,
            ..keyword.clone()
        };
        assert!(!adverb.is_keyword());
    }
}
