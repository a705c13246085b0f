//! Scoring policy: weights, thresholds, and the static word lists.
//!
//! Everything tunable about the heuristic scorer lives here so it can be
//! adjusted and tested without touching the aggregation logic.

use crate::model::DimensionScores;

/// Characters stripped from both ends of each whitespace-separated chunk.
pub const TRIM_CHARS: &[char] = &[
    '.', ',', ':', ';', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '`', '-', '_',
];

/// Words never treated as question keywords.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "else", "for", "to", "of", "in", "on",
    "at", "by", "is", "are", "was", "were", "be", "been", "being", "with", "as", "that", "this",
    "it", "its", "from", "into",
];

/// Minimum keyword length, in characters.
pub const MIN_KEYWORD_LEN: usize = 4;

/// Filler phrases that cost clarity, matched case-insensitively.
pub const FILLER_PHRASES: &[&str] = &[
    "basically",
    "like",
    "sort of",
    "kind of",
    "actually",
    "literally",
];

/// Terms signalling a Situation/Task/Action/Result narrative.
pub const STAR_TERMS: &[&str] = &["situation", "task", "action", "result", "impact", "learned"];

/// Code and query markers that signal technical depth.
///
/// Matched case-insensitively against the answer.
pub const CODE_MARKERS: &[&str] = &[
    "def ", "class ", "{", "}", "=>", "<>", "try:", "catch", "finally", "SELECT ", "JOIN ",
];

// Length window, in words.
pub const IDEAL_MIN_WORDS: usize = 40;
pub const IDEAL_MAX_WORDS: usize = 180;
/// Words past the window at which the length score reaches zero.
pub const OVERLONG_DECAY_WORDS: f64 = 220.0;

// Clarity.
pub const TARGET_SENTENCES: f64 = 4.0;
pub const FILLER_PENALTY_PER_HIT: f64 = 0.05;
pub const FILLER_PENALTY_CAP: f64 = 0.4;

// Structure.
pub const STAR_TARGET_HITS: f64 = 4.0;

// Technical depth.
pub const MARKER_WEIGHT: f64 = 0.1;
pub const MARKER_CAP: f64 = 0.4;
pub const DIGIT_BONUS: f64 = 0.2;
pub const KEYWORD_MENTION_WEIGHT: f64 = 0.08;
pub const KEYWORD_MENTION_CAP: f64 = 0.4;

// Session blend.
pub const COMPLETENESS_WEIGHT: f64 = 0.30;
pub const QUALITY_WEIGHT: f64 = 0.70;

/// Characters of the trimmed answer kept in the excerpt.
pub const EXCERPT_CHARS: usize = 180;
pub const ELLIPSIS: &str = "…";

pub const MAX_TIPS_PER_QUESTION: usize = 3;
/// Cap on session-level strengths and improvements.
pub const MAX_SESSION_ITEMS: usize = 5;

pub const SESSION_SUMMARY: &str =
    "Heuristic feedback based on coverage, clarity, structure, and depth.";

pub const COMPLETENESS_GAP: &str = "Answer all questions for better completeness";

/// Generic preparation tips attached to every heuristic session.
pub const SUGGESTIONS: &[&str] = &[
    "Use STAR (Situation, Task, Action, Result) to structure behavioral answers",
    "Target 4–8 concise sentences per answer with concrete examples and metrics",
    "Mirror key terms from the question in your answer to ensure coverage",
    "Close with outcomes/impact; quantify where possible",
];

/// Relative weight of each dimension in a question's overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionWeights {
    pub keyword_coverage: f64,
    pub length: f64,
    pub clarity: f64,
    pub structure: f64,
    pub technical_depth: f64,
}

pub const WEIGHTS: DimensionWeights = DimensionWeights {
    keyword_coverage: 0.35,
    length: 0.15,
    clarity: 0.15,
    structure: 0.15,
    technical_depth: 0.20,
};

impl DimensionWeights {
    /// Weighted sum of the dimension scores.
    pub fn blend(&self, scores: &DimensionScores) -> f64 {
        self.keyword_coverage * scores.keyword_coverage
            + self.length * scores.length
            + self.clarity * scores.clarity
            + self.structure * scores.structure
            + self.technical_depth * scores.technical_depth
    }

    pub fn total(&self) -> f64 {
        self.keyword_coverage + self.length + self.clarity + self.structure + self.technical_depth
    }
}

/// The five scoring dimensions, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    KeywordCoverage,
    Length,
    Clarity,
    Structure,
    TechnicalDepth,
}

/// How a dimension score reads against its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Strong,
    Adequate,
    Weak,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::KeywordCoverage,
        Dimension::Length,
        Dimension::Clarity,
        Dimension::Structure,
        Dimension::TechnicalDepth,
    ];

    /// Short column heading for tables.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::KeywordCoverage => "Keywords",
            Dimension::Length => "Length",
            Dimension::Clarity => "Clarity",
            Dimension::Structure => "Structure",
            Dimension::TechnicalDepth => "Depth",
        }
    }

    /// Score at or above which the dimension is a strength.
    pub fn strong_at(self) -> f64 {
        match self {
            Dimension::KeywordCoverage => 0.7,
            Dimension::Length => 0.8,
            Dimension::Clarity => 0.8,
            Dimension::Structure => 0.7,
            Dimension::TechnicalDepth => 0.7,
        }
    }

    /// Score below which the dimension earns a tip.
    ///
    /// Length and clarity have a neutral band; the others are binary.
    pub fn weak_below(self) -> f64 {
        match self {
            Dimension::Length | Dimension::Clarity => 0.4,
            other => other.strong_at(),
        }
    }

    pub fn assess(self, score: f64) -> Assessment {
        if score >= self.strong_at() {
            Assessment::Strong
        } else if score < self.weak_below() {
            Assessment::Weak
        } else {
            Assessment::Adequate
        }
    }

    pub fn strength(self) -> &'static str {
        match self {
            Dimension::KeywordCoverage => "Addresses most key concepts in the question",
            Dimension::Length => "Good level of detail and elaboration",
            Dimension::Clarity => "Clear writing and sentence structure",
            Dimension::Structure => "Structured response (STAR-like)",
            Dimension::TechnicalDepth => "Solid technical depth/examples",
        }
    }

    pub fn tip(self) -> &'static str {
        match self {
            Dimension::KeywordCoverage => "Cover more of the question's key terms and concepts",
            Dimension::Length => "Add more detail; aim for 4–8 concise sentences",
            Dimension::Clarity => "Simplify sentences and avoid filler words",
            Dimension::Structure => "Add brief structure: context, actions, and result",
            Dimension::TechnicalDepth => {
                "Include concrete technical details, figures, or examples"
            }
        }
    }
}
