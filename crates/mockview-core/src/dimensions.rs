//! The five dimension scorers.
//!
//! Each scorer is a total function of the answer text (and, where relevant,
//! the question keywords) returning a value clamped to `[0, 1]`.

use std::collections::{BTreeSet, HashSet};

use crate::model::DimensionScores;
use crate::policy::{
    CODE_MARKERS, DIGIT_BONUS, FILLER_PENALTY_CAP, FILLER_PENALTY_PER_HIT, FILLER_PHRASES,
    IDEAL_MAX_WORDS, IDEAL_MIN_WORDS, KEYWORD_MENTION_CAP, KEYWORD_MENTION_WEIGHT, MARKER_CAP,
    MARKER_WEIGHT, OVERLONG_DECAY_WORDS, STAR_TARGET_HITS, STAR_TERMS, TARGET_SENTENCES,
};
use crate::text::{tokenize, word_count};

/// Score an answer on all five dimensions.
pub fn score_answer(keywords: &[String], answer: &str) -> DimensionScores {
    DimensionScores {
        keyword_coverage: keyword_coverage(keywords, answer),
        length: length(answer),
        clarity: clarity(answer),
        structure: structure(answer),
        technical_depth: technical_depth(keywords, answer),
    }
}

/// Fraction of distinct question keywords that appear as answer tokens.
///
/// A question without keywords is vacuously covered.
pub fn keyword_coverage(keywords: &[String], answer: &str) -> f64 {
    let unique = unique_keywords(keywords);
    if unique.is_empty() {
        return 1.0;
    }
    let answer_tokens: HashSet<String> = tokenize(answer).into_iter().collect();
    let hits = unique.iter().filter(|k| answer_tokens.contains(**k)).count();
    clamp_unit(hits as f64 / unique.len() as f64)
}

/// Full marks inside the 40–180 word window, linear decay either side.
pub fn length(answer: &str) -> f64 {
    let score = match word_count(answer) {
        0 => 0.0,
        n if n < IDEAL_MIN_WORDS => n as f64 / IDEAL_MIN_WORDS as f64,
        n if n <= IDEAL_MAX_WORDS => 1.0,
        n => 1.0 - (n - IDEAL_MAX_WORDS) as f64 / OVERLONG_DECAY_WORDS,
    };
    clamp_unit(score)
}

/// More sentences (up to four) read clearer; filler phrases cost points.
pub fn clarity(answer: &str) -> f64 {
    let normalized = answer.replace(|c: char| c == '?' || c == '!', ".");
    let sentences = normalized
        .split('.')
        .filter(|s| !s.trim().is_empty())
        .count();
    if sentences == 0 {
        return 0.0;
    }

    let lower = answer.to_lowercase();
    let filler_hits: usize = FILLER_PHRASES
        .iter()
        .map(|phrase| lower.matches(*phrase).count())
        .sum();

    let base = (sentences as f64 / TARGET_SENTENCES).min(1.0);
    let penalty = (filler_hits as f64 * FILLER_PENALTY_PER_HIT).min(FILLER_PENALTY_CAP);
    clamp_unit(base - penalty)
}

/// Distinct STAR-style terms mentioned, four or more for full marks.
pub fn structure(answer: &str) -> f64 {
    let lower = answer.to_lowercase();
    let hits = STAR_TERMS.iter().filter(|term| lower.contains(**term)).count();
    clamp_unit(hits as f64 / STAR_TARGET_HITS)
}

/// Code markers, numbers, and question keywords mentioned in the answer.
pub fn technical_depth(keywords: &[String], answer: &str) -> f64 {
    let lower = answer.to_lowercase();

    let marker_hits = CODE_MARKERS
        .iter()
        .filter(|marker| lower.contains(&marker.to_lowercase()))
        .count();
    let has_number = lower.chars().any(|c| c.is_ascii_digit());
    let keyword_hits = unique_keywords(keywords)
        .iter()
        .filter(|k| lower.contains(**k))
        .count();

    let mut score = (marker_hits as f64 * MARKER_WEIGHT).min(MARKER_CAP);
    if has_number {
        score += DIGIT_BONUS;
    }
    score += (keyword_hits as f64 * KEYWORD_MENTION_WEIGHT).min(KEYWORD_MENTION_CAP);
    clamp_unit(score)
}

fn unique_keywords(keywords: &[String]) -> BTreeSet<&str> {
    keywords.iter().map(String::as_str).collect()
}

/// Clamp into `[0, 1]`, mapping NaN to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
