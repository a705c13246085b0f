//! Per-question and per-session aggregation of dimension scores.
//!
//! Both aggregators are pure: identical input yields identical output.

use crate::dimensions::{clamp_unit, score_answer};
use crate::model::{
    round2, FeedbackSource, QnAPair, QuestionFeedback, QuestionScores, SessionFeedback,
    SessionMetrics,
};
use crate::policy::{
    Assessment, Dimension, COMPLETENESS_GAP, COMPLETENESS_WEIGHT, ELLIPSIS, EXCERPT_CHARS,
    MAX_SESSION_ITEMS, MAX_TIPS_PER_QUESTION, QUALITY_WEIGHT, SESSION_SUMMARY, SUGGESTIONS,
    WEIGHTS,
};
use crate::text::{keywords_from_question, word_count};

/// A scored question, before session roll-up.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredQuestion {
    pub feedback: QuestionFeedback,
    /// Unrounded weighted score, used for the session mean.
    pub overall: f64,
    pub strengths: Vec<&'static str>,
    pub improvements: Vec<&'static str>,
}

/// Score one pair at its 1-based position in the session.
pub fn score_question(index: usize, pair: &QnAPair) -> ScoredQuestion {
    let question = pair.question.trim();
    let answer = pair.answer.trim();

    let keywords = keywords_from_question(question);
    let dimensions = score_answer(&keywords, answer);
    let overall = clamp_unit(WEIGHTS.blend(&dimensions));

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    for dimension in Dimension::ALL {
        match dimension.assess(dimensions.get(dimension)) {
            Assessment::Strong => strengths.push(dimension.strength()),
            Assessment::Weak => improvements.push(dimension.tip()),
            Assessment::Adequate => {}
        }
    }

    let feedback = QuestionFeedback {
        index,
        question: question.to_string(),
        answer_excerpt: excerpt(answer),
        answer_word_count: word_count(answer),
        scores: QuestionScores {
            dimensions: dimensions.rounded(),
            overall: round2(overall),
        },
        tips: improvements
            .iter()
            .take(MAX_TIPS_PER_QUESTION)
            .map(|t| t.to_string())
            .collect(),
    };

    ScoredQuestion {
        feedback,
        overall,
        strengths,
        improvements,
    }
}

/// Score a whole session.
///
/// An empty session short-circuits to no-data feedback with a null score.
pub fn score_session(session_id: &str, pairs: &[QnAPair]) -> SessionFeedback {
    if pairs.is_empty() {
        return SessionFeedback::no_data(session_id);
    }

    let total = pairs.len();
    let answered = pairs.iter().filter(|p| p.is_answered()).count();
    let completeness = answered as f64 / total.max(1) as f64;

    let scored: Vec<ScoredQuestion> = pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| score_question(i + 1, pair))
        .collect();

    let quality = scored.iter().map(|q| q.overall).sum::<f64>() / scored.len().max(1) as f64;
    let blended = clamp_unit(COMPLETENESS_WEIGHT * completeness + QUALITY_WEIGHT * quality);
    let score = (blended * 100.0).round_ties_even() as u32;

    let mut strengths = Vec::new();
    if answered > 0 {
        strengths.push(format!("Answered {answered} of {total} questions"));
    }
    strengths.extend(leading(scored.iter().flat_map(|q| q.strengths.iter().copied())));
    strengths.truncate(MAX_SESSION_ITEMS);

    let mut improvements = Vec::new();
    if answered < total {
        improvements.push(COMPLETENESS_GAP.to_string());
    }
    improvements.extend(leading(
        scored.iter().flat_map(|q| q.improvements.iter().copied()),
    ));
    improvements.truncate(MAX_SESSION_ITEMS);

    SessionFeedback {
        session_id: session_id.to_string(),
        score: Some(score),
        summary: SESSION_SUMMARY.to_string(),
        strengths,
        improvements,
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        metrics: Some(SessionMetrics {
            completeness: round2(completeness),
            quality_overall: round2(quality),
            total_questions: total,
            answered,
        }),
        per_question: scored.into_iter().map(|q| q.feedback).collect(),
        source: FeedbackSource::Heuristic,
    }
}

/// Leading characters of the answer, marked when cut short.
fn excerpt(answer: &str) -> String {
    let mut chars = answer.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    }
}

/// First `MAX_SESSION_ITEMS` items in question order, repeats included.
fn leading<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items.take(MAX_SESSION_ITEMS).map(str::to_string).collect()
}
