//! Built-in deterministic annotator: rule-based sentence segmentation plus a
//! lexicon-and-suffix part-of-speech tagger. No model downloads, no network,
//! identical output for identical input.

use super::{Annotator, Document, PartOfSpeech, Sentence, Token};
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashSet;

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a","an","the","this","that","these","those","each","every","both","either","neither",
        "some","any","no","all","another",
    ]
    .into_iter()
    .collect()
});

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i","you","he","she","it","we","they","me","him","her","us","them",
        "my","your","his","its","our","their","mine","yours","ours","theirs",
        "who","whom","whose","which","what","something","anything","nothing","everything",
        "someone","anyone","everyone","itself","themselves","ourselves",
    ]
    .into_iter()
    .collect()
});

static ADPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "of","in","on","at","by","for","with","from","to","into","onto","over","under",
        "between","among","within","without","through","throughout","during","before","after",
        "above","below","against","along","across","behind","beyond","near","toward","towards",
        "upon","about","around","per","via","amid","despite",
    ]
    .into_iter()
    .collect()
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and","or","but","nor","so","yet","because","although","though","while","if","unless",
        "until","since","than","whether","whereas","when","where","as",
    ]
    .into_iter()
    .collect()
});

static AUXILIARIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "is","are","was","were","be","been","being","am","do","does","did","have","has","had",
        "will","would","shall","should","can","could","may","might","must",
    ]
    .into_iter()
    .collect()
});

static PARTICLES: Lazy<HashSet<&'static str>> = Lazy::new(|| ["not"].into_iter().collect());

static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "very","also","only","just","too","quite","rather","almost","always","never","often",
        "sometimes","usually","already","still","even","here","there","now","then","how","why",
        "however","therefore","moreover","furthermore","thus","hence","instead","together",
        "well","more","most","less","least","again","further","once",
    ]
    .into_iter()
    .collect()
});

// Verbs common in policy and development prose; inflections resolve via
// suffix rules, so only base forms and irregulars need listing
static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ensure","promote","achieve","end","eradicate","reduce","build","strengthen","combat",
        "conserve","protect","restore","foster","empower","provide","improve","support",
        "increase","implement","take","make","made","halt","revitalize","manage","reverse",
        "adopt","address","require","remain","become","develop","establish","expand","enhance",
        "maintain","prevent","says","said","say","show","shows","shown","found","find","use",
        "meet","face","need","help","work","call","set","give","gave","grow","grew","fell",
        "fall","rise","rose","reach","seek","sought",
    ]
    .into_iter()
    .collect()
});

static ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good","great","new","old","high","low","large","small","many","few","several","other",
        "important","key","main","major","minor","global","national","local","public","private",
        "poor","rich","safe","clean","modern","decent","extreme","free","full","long","short",
        "early","late","young","strong","weak","healthy","rural","urban","such","own","same",
        "least","best","worst","better","worse","first","second","third","last","next",
    ]
    .into_iter()
    .collect()
});

// General high-frequency stoplist; closed-class words are marked as stop-words
// through their lexicon membership, this covers the rest
const STOPWORD_LIST: &[&str] = &[
    "a","about","above","after","again","against","all","also","am","an","and","any","are","as",
    "at","be","because","been","before","being","below","between","both","but","by","can",
    "could","did","do","does","down","during","each","few","for","from","further","had","has",
    "have","he","her","here","hers","him","his","how","i","if","in","into","is","it","its",
    "just","may","me","might","more","most","must","my","no","nor","not","now","of","off","on",
    "once","only","or","other","our","ours","out","over","own","same","shall","she","should",
    "so","some","such","than","that","the","their","theirs","them","then","there","these",
    "they","this","those","through","to","too","under","until","up","upon","very","was","we",
    "were","what","when","where","whether","which","while","who","whom","why","will","with",
    "within","without","would","you","your","yours",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORD_LIST.iter().copied().collect());

/// Deterministic local annotator
pub struct LexiconAnnotator;

impl LexiconAnnotator {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core used by the async trait impl and by tests
    pub fn annotate_text(&self, text: &str) -> Document {
        let sentences = split_sentences(text)
            .into_iter()
            .map(|text| {
                let tokens = tokenize(&text);
                Sentence { text, tokens }
            })
            .collect();
        Document { sentences }
    }
}

impl Default for LexiconAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Annotator for LexiconAnnotator {
    async fn annotate(&self, text: &str) -> Result<Document> {
        Ok(self.annotate_text(text))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Split text at sentence-final punctuation followed by whitespace or
/// end of text. Trailing quotes and brackets stay with their sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            while let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}') {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            match chars.peek() {
                Some(next) if !next.is_whitespace() => {}
                _ => flush_sentence(&mut current, &mut sentences),
            }
        }
    }
    flush_sentence(&mut current, &mut sentences);
    sentences
}

fn flush_sentence(current: &mut String, out: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}

/// Word tokens are alphanumeric runs (apostrophes between letters stay
/// inside the word); every other non-space character is its own token.
fn tokenize(sentence: &str) -> Vec<Token> {
    let chars: Vec<char> = sentence.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut word_seen = false;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_alphanumeric() {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || is_inner_apostrophe(&chars, i))
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(word_token(text, !word_seen));
            word_seen = true;
        } else {
            tokens.push(punct_token(c));
            i += 1;
        }
    }
    tokens
}

fn is_inner_apostrophe(chars: &[char], i: usize) -> bool {
    matches!(chars[i], '\'' | '\u{2019}')
        && i > 0
        && chars[i - 1].is_alphanumeric()
        && i + 1 < chars.len()
        && chars[i + 1].is_alphanumeric()
}

fn word_token(text: String, sentence_initial: bool) -> Token {
    let normalized = text.to_lowercase();
    let pos = classify(&text, &normalized, sentence_initial);
    let is_stopword = STOPWORDS.contains(normalized.as_str())
        || DETERMINERS.contains(normalized.as_str())
        || PRONOUNS.contains(normalized.as_str())
        || ADPOSITIONS.contains(normalized.as_str())
        || CONJUNCTIONS.contains(normalized.as_str())
        || AUXILIARIES.contains(normalized.as_str())
        || PARTICLES.contains(normalized.as_str());
    Token {
        text,
        normalized,
        pos,
        is_stopword,
        is_punctuation: false,
    }
}

fn punct_token(c: char) -> Token {
    let text = c.to_string();
    Token {
        normalized: text.clone(),
        text,
        pos: PartOfSpeech::Punctuation,
        is_stopword: false,
        is_punctuation: true,
    }
}

fn classify(text: &str, normalized: &str, sentence_initial: bool) -> PartOfSpeech {
    if DETERMINERS.contains(normalized) {
        return PartOfSpeech::Determiner;
    }
    if PRONOUNS.contains(normalized) {
        return PartOfSpeech::Pronoun;
    }
    if ADPOSITIONS.contains(normalized) {
        return PartOfSpeech::Adposition;
    }
    if CONJUNCTIONS.contains(normalized) {
        return PartOfSpeech::Conjunction;
    }
    if AUXILIARIES.contains(normalized) {
        return PartOfSpeech::Auxiliary;
    }
    if PARTICLES.contains(normalized) {
        return PartOfSpeech::Particle;
    }
    if ADVERBS.contains(normalized) {
        return PartOfSpeech::Adverb;
    }
    if normalized.chars().all(|c| c.is_ascii_digit()) {
        return PartOfSpeech::Number;
    }
    if VERBS.contains(normalized) {
        return PartOfSpeech::Verb;
    }
    if ADJECTIVES.contains(normalized) {
        return PartOfSpeech::Adjective;
    }
    // Capitalization only counts away from the sentence start, where it is
    // orthographic rather than informative
    if !sentence_initial && text.chars().next().is_some_and(|c| c.is_uppercase()) {
        return PartOfSpeech::ProperNoun;
    }
    classify_by_suffix(normalized)
}

fn classify_by_suffix(word: &str) -> PartOfSpeech {
    const NOUN_SUFFIXES: &[&str] = &[
        "tion", "sion", "ment", "ness", "ity", "ance", "ence", "ship", "ism", "hood", "age",
        "ure",
    ];
    const ADJECTIVE_SUFFIXES: &[&str] = &[
        "ous", "ful", "less", "able", "ible", "ive", "ish", "ic", "al", "ian",
    ];

    // "lly" dodges false positives like "supply" and "assembly"
    if word.len() > 5 && word.ends_with("lly") {
        return PartOfSpeech::Adverb;
    }
    for suffix in NOUN_SUFFIXES {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
            return PartOfSpeech::Noun;
        }
    }
    for suffix in ADJECTIVE_SUFFIXES {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
            return PartOfSpeech::Adjective;
        }
    }
    if word.len() > 4 && word.ends_with("ing") {
        return PartOfSpeech::Verb;
    }
    if word.len() > 3 && word.ends_with("ed") {
        return PartOfSpeech::Verb;
    }
    PartOfSpeech::Noun
}
