//! Tokenizer and question keyword extraction.

use crate::policy::{MIN_KEYWORD_LEN, STOPWORDS, TRIM_CHARS};

/// Split text on whitespace, strip edge punctuation, and lowercase each chunk.
///
/// A chunk made entirely of punctuation yields an empty token; callers that
/// count words should use [`word_count`].
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|chunk| chunk.trim_matches(|c| TRIM_CHARS.contains(&c)).to_lowercase())
        .collect()
}

/// Number of non-empty tokens.
pub fn word_count(text: &str) -> usize {
    tokenize(text).iter().filter(|t| !t.is_empty()).count()
}

/// Salient keywords of a question, in order of appearance.
///
/// Duplicates are kept; scorers deduplicate as needed.
pub fn keywords_from_question(question: &str) -> Vec<String> {
    tokenize(question)
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_KEYWORD_LEN && !STOPWORDS.contains(&t.as_str()))
        .collect()
}
