//! Interview question generation via the generative-model collaborator.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::prompt::{questions_prompt, INTERVIEWER_SYSTEM_PROMPT};
use crate::traits::{strip_code_fences, GenerateRequest, LlmProvider};

/// Default number of questions to request.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// What kind of candidate to generate questions for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

/// Generates interview questions with a model.
pub struct QuestionGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl QuestionGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Ask the model for questions and parse its reply.
    pub async fn generate(&self, request: &QuestionRequest) -> Result<Vec<String>> {
        anyhow::ensure!(!request.role.trim().is_empty(), "role must not be empty");
        anyhow::ensure!(request.count >= 1, "question count must be at least 1");

        let generate = GenerateRequest {
            model: self.model.clone(),
            prompt: questions_prompt(
                request.role.trim(),
                &request.skills,
                request.experience_years,
                request.count,
            ),
            system_prompt: Some(INTERVIEWER_SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .provider
            .generate(&generate)
            .await
            .with_context(|| format!("question generation via {} failed", self.provider.name()))?;

        let questions = parse_question_list(&response.content);
        if questions.is_empty() {
            anyhow::bail!("model returned no questions");
        }
        tracing::info!(
            count = questions.len(),
            role = %request.role,
            "generated interview questions"
        );
        Ok(questions)
    }
}

/// Parse a model reply into individual questions.
///
/// Accepts a JSON array, a bracketed list of quoted strings, or one question
/// per line with optional numbering or bullets.
pub fn parse_question_list(reply: &str) -> Vec<String> {
    let body = strip_code_fences(reply);

    if body.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(body) {
            return clean_all(list);
        }
        let quoted = quoted_items(body);
        if !quoted.is_empty() {
            return clean_all(quoted);
        }
    }

    clean_all(body.lines().map(str::to_string))
}

fn clean_all(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| clean_line(&item))
        .collect()
}

fn clean_line(line: &str) -> Option<String> {
    let mut s = line.trim();
    s = s.trim_start_matches(['-', '*', '•']).trim_start();
    s = strip_numbering(s);
    s = s.trim_end_matches(',').trim();
    s = s
        .trim_matches(|c| c == '"' || c == '\'' || c == '[' || c == ']')
        .trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Drop a leading `1.`, `2)`, or `Q3:` marker.
fn strip_numbering(s: &str) -> &str {
    let without_q = s.strip_prefix(['Q', 'q']).unwrap_or(s);
    let digits = without_q.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return s;
    }
    let rest = &without_q[digits..];
    match rest.chars().next() {
        Some('.' | ')' | ':') => rest[1..].trim_start(),
        _ => s,
    }
}

/// Extract single- or double-quoted strings, honoring backslash escapes.
fn quoted_items(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in body.chars() {
        match quote {
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                    current.clear();
                }
            }
            Some(q) => {
                if escaped {
                    current.push(c);
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    items.push(std::mem::take(&mut current));
                    quote = None;
                } else {
                    current.push(c);
                }
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_array() {
        let reply = r#"["What is ownership?", "Explain lifetimes, briefly."]"#;
        assert_eq!(
            parse_question_list(reply),
            vec!["What is ownership?", "Explain lifetimes, briefly."]
        );
    }

    #[test]
    fn parse_fenced_json_array() {
        let reply = "```json\n[\"One?\", \"Two?\"]\n```";
        assert_eq!(parse_question_list(reply), vec!["One?", "Two?"]);
    }

    #[test]
    fn parse_python_style_list() {
        let reply = "['What\\'s a trait?', 'How do you handle errors, in general?']";
        assert_eq!(
            parse_question_list(reply),
            vec!["What's a trait?", "How do you handle errors, in general?"]
        );
    }

    #[test]
    fn parse_numbered_lines() {
        let reply = "1. What is a mutex?\n2) When would you use an Arc?\n\n3: Explain Send.";
        assert_eq!(
            parse_question_list(reply),
            vec![
                "What is a mutex?",
                "When would you use an Arc?",
                "Explain Send."
            ]
        );
    }

    #[test]
    fn parse_bullets_and_quotes() {
        let reply = "- \"What is a closure?\",\n* 'What is a slice?'\n• Q3: Why async?";
        assert_eq!(
            parse_question_list(reply),
            vec!["What is a closure?", "What is a slice?", "Why async?"]
        );
    }

    #[test]
    fn numbers_inside_questions_are_kept() {
        assert_eq!(
            parse_question_list("How do 2 threads share data?"),
            vec!["How do 2 threads share data?"]
        );
        assert_eq!(
            parse_question_list("Queue design for 10k msgs/s?"),
            vec!["Queue design for 10k msgs/s?"]
        );
    }

    #[test]
    fn parse_empty_reply() {
        assert!(parse_question_list("").is_empty());
        assert!(parse_question_list("\n\n  \n").is_empty());
        assert!(parse_question_list("[]").is_empty());
    }
}
