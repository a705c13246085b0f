//! Prompt construction for the generative-model collaborator.

use crate::model::QnAPair;

/// System prompt for feedback requests.
pub const COACH_SYSTEM_PROMPT: &str = "You are an expert Interview Coach. You review interview transcripts and reply with strict JSON only.";

/// System prompt for question generation requests.
pub const INTERVIEWER_SYSTEM_PROMPT: &str = "You are an AI interview assistant. You write interview questions and reply with the questions only.";

/// Render pairs as a numbered `Q1:`/`A1:` transcript.
pub fn qna_transcript(pairs: &[QnAPair]) -> String {
    pairs
        .iter()
        .enumerate()
        .flat_map(|(i, pair)| {
            let n = i + 1;
            [
                format!("Q{n}: {}", pair.question.trim()),
                format!("A{n}: {}", pair.answer.trim()),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking the model to review a session and answer in strict JSON.
pub fn feedback_prompt(pairs: &[QnAPair]) -> String {
    format!(
        "Review the following interview questions and the candidate's answers. \
Provide concise, actionable feedback.

Return a strict JSON object with the following keys (and no extra text):
- score: integer 0-100
- summary: short paragraph
- strengths: string array
- improvements: string array
- suggestions: string array (targeted practice or resources)

Interview Q&A:
{}
",
        qna_transcript(pairs)
    )
}

/// Prompt asking the model for a list of interview questions.
pub fn questions_prompt(role: &str, skills: &[String], experience_years: u32, count: usize) -> String {
    let skills = if skills.is_empty() {
        "general software engineering".to_string()
    } else {
        skills.join(", ")
    };
    format!(
        "Generate {count} technical interview questions for a candidate applying for the role of {role}.
The candidate has {experience_years} years of experience and the following skills: {skills}.
The questions should be a mix of theoretical and practical ones, but not multiple choice.

Return ONLY a JSON array of strings, where each string is a question. \
Do NOT include explanations, numbering, or any other text.
"
    )
}
