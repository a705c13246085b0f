//! Markdown report generator.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use mockview_core::model::SessionFeedback;
use mockview_core::policy::Dimension;

/// Keep table cells on one line and stop `|` from splitting columns.
fn cell(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

fn push_section(md: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(md, "## {title}\n");
    for item in items {
        let _ = writeln!(md, "- {item}");
    }
    md.push('\n');
}

/// Generate a Markdown report for one session's feedback.
pub fn generate_markdown(feedback: &SessionFeedback) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# Interview feedback: {}\n", feedback.session_id);
    let score = feedback
        .score
        .map(|s| format!("{s}/100"))
        .unwrap_or_else(|| "n/a".to_string());
    let _ = writeln!(md, "**Score:** {score} | **Source:** {}\n", feedback.source);
    let _ = writeln!(md, "{}\n", feedback.summary);

    if let Some(m) = &feedback.metrics {
        let _ = writeln!(
            md,
            "Answered {} of {} questions. Completeness {:.2}, quality {:.2}.\n",
            m.answered, m.total_questions, m.completeness, m.quality_overall
        );
    }

    push_section(&mut md, "Strengths", &feedback.strengths);
    push_section(&mut md, "Improvements", &feedback.improvements);
    push_section(&mut md, "Suggestions", &feedback.suggestions);

    if !feedback.per_question.is_empty() {
        md.push_str("## Questions\n\n| # | Question |");
        for dimension in Dimension::ALL {
            let _ = write!(md, " {} |", dimension.label());
        }
        md.push_str(" Overall |\n|---|---|");
        md.push_str(&"---:|".repeat(Dimension::ALL.len() + 1));
        md.push('\n');

        for q in &feedback.per_question {
            let _ = write!(md, "| {} | {} |", q.index, cell(&q.question));
            for dimension in Dimension::ALL {
                let _ = write!(md, " {:.2} |", q.scores.dimensions.get(dimension));
            }
            let _ = writeln!(md, " {:.2} |", q.scores.overall);
        }
        md.push('\n');

        let with_tips: Vec<_> = feedback
            .per_question
            .iter()
            .filter(|q| !q.tips.is_empty())
            .collect();
        if !with_tips.is_empty() {
            md.push_str("### Tips\n\n");
            for q in with_tips {
                let _ = writeln!(md, "- **Q{}:** {}", q.index, q.tips.join("; "));
            }
            md.push('\n');
        }
    }

    md
}

/// Write a Markdown report to a file, creating parent directories.
pub fn write_markdown_report(feedback: &SessionFeedback, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, generate_markdown(feedback))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
