//! Tokenisation shared by the matcher and the analysis pass.
//!
//! Lowercases and splits on Unicode word boundaries. Runs of `+` or `#` directly
//! after a word are re-attached, so `C++`, `C#` and `Node.js` survive as single
//! tokens. Sentence-final dots are dropped.

use std::collections::BTreeSet;

use unicode_segmentation::UnicodeSegmentation;

/// Words that carry no signal when comparing a profile item with a posting.
const STOP_WORDS: &[&str] = &[
    "a", "ability", "about", "an", "and", "any", "are", "as", "at", "be", "been", "but", "by",
    "can", "day", "did", "etc", "experience", "for", "from", "get", "good", "had", "has",
    "have", "her", "him", "his", "how", "in", "into", "is", "it", "its", "join", "knowledge",
    "let", "new", "not", "now", "of", "on", "one", "or", "our", "out", "plus", "put", "say",
    "she", "skills", "so", "strong", "that", "the", "their", "this", "to", "too", "two", "use",
    "using", "was", "way", "we", "who", "will", "with", "work", "years", "you", "your",
];

/// Splits text into lowercase tokens in order, keeping duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();
    // Whether the previous segment was a word that a `+`/`#` run may extend
    let mut attachable = false;
    for segment in lower.split_word_bounds() {
        if segment.chars().any(char::is_alphanumeric) {
            tokens.push(segment.trim_matches('.').to_string());
            attachable = true;
        } else if attachable && segment.chars().all(|c| matches!(c, '+' | '#')) {
            if let Some(last) = tokens.last_mut() {
                last.push_str(segment);
            }
        } else {
            attachable = false;
        }
    }
    tokens.retain(|t| !t.is_empty());
    tokens
}

/// Unique content-bearing tokens: stop-words and single characters dropped.
pub fn keywords(text: &str) -> BTreeSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= 2 && !is_stop_word(t))
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// True when `phrase` occurs in `haystack` as a contiguous run of whole tokens.
pub fn contains_phrase(haystack: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > haystack.len() {
        return false;
    }
    haystack.windows(phrase.len()).any(|window| window == phrase)
}
