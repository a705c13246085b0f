//! Core data model types for mockview.
//!
//! These are the types that flow through the scoring pipeline and out to
//! renderers: question/answer pairs in, per-question and per-session
//! feedback out.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::Dimension;

/// Summary used when a session has no recorded question/answer pairs.
pub const NO_DATA_SUMMARY: &str = "No Q&A found for the provided session.";

/// Summary used when the model reply was blank and could not be parsed.
pub const INVALID_MODEL_OUTPUT_SUMMARY: &str = "Feedback generation failed to produce valid JSON.";

/// One interview question and the candidate's free-text answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnAPair {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl QnAPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// An answer counts once it has any non-whitespace content.
    pub fn is_answered(&self) -> bool {
        !self.answer.trim().is_empty()
    }
}

/// Scores for the five independent answer-quality dimensions, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub keyword_coverage: f64,
    pub length: f64,
    pub clarity: f64,
    pub structure: f64,
    pub technical_depth: f64,
}

impl DimensionScores {
    /// Score for a single dimension.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::KeywordCoverage => self.keyword_coverage,
            Dimension::Length => self.length,
            Dimension::Clarity => self.clarity,
            Dimension::Structure => self.structure,
            Dimension::TechnicalDepth => self.technical_depth,
        }
    }

    /// Copy with every score rounded to two decimals for presentation.
    pub fn rounded(&self) -> Self {
        Self {
            keyword_coverage: round2(self.keyword_coverage),
            length: round2(self.length),
            clarity: round2(self.clarity),
            structure: round2(self.structure),
            technical_depth: round2(self.technical_depth),
        }
    }
}

/// Dimension scores plus the weighted blend for one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionScores {
    #[serde(flatten)]
    pub dimensions: DimensionScores,
    pub overall: f64,
}

/// Feedback for a single question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    /// 1-based position of the pair within the session.
    pub index: usize,
    pub question: String,
    /// Leading slice of the trimmed answer, with an ellipsis if truncated.
    pub answer_excerpt: String,
    pub answer_word_count: usize,
    /// Scores rounded to two decimals.
    pub scores: QuestionScores,
    /// At most three improvement tips, in dimension order.
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Session-wide numbers behind the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub completeness: f64,
    pub quality_overall: f64,
    pub total_questions: usize,
    pub answered: usize,
}

/// Where a piece of session feedback came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    /// Rule-based scoring engine.
    #[default]
    Heuristic,
    /// Structured reply from the generative model.
    Model,
    /// The model replied but the reply could not be parsed.
    ModelFallback,
    /// The session had no recorded pairs.
    NoData,
}

impl fmt::Display for FeedbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackSource::Heuristic => write!(f, "heuristic"),
            FeedbackSource::Model => write!(f, "model"),
            FeedbackSource::ModelFallback => write!(f, "model_fallback"),
            FeedbackSource::NoData => write!(f, "no_data"),
        }
    }
}

/// Feedback for a whole interview session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFeedback {
    pub session_id: String,
    /// 0–100, or `None` when there was nothing to score.
    pub score: Option<u32>,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SessionMetrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub per_question: Vec<QuestionFeedback>,
    #[serde(default)]
    pub source: FeedbackSource,
}

impl SessionFeedback {
    /// Zero-confidence feedback for a session with no recorded pairs.
    pub fn no_data(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            score: None,
            summary: NO_DATA_SUMMARY.to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            suggestions: Vec::new(),
            metrics: None,
            per_question: Vec::new(),
            source: FeedbackSource::NoData,
        }
    }

    /// Feedback carrying an unparseable model reply verbatim.
    pub fn model_fallback(session_id: &str, raw_reply: &str) -> Self {
        let summary = if raw_reply.is_empty() {
            INVALID_MODEL_OUTPUT_SUMMARY.to_string()
        } else {
            raw_reply.to_string()
        };
        Self {
            summary,
            source: FeedbackSource::ModelFallback,
            ..Self::no_data(session_id)
        }
    }
}

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
