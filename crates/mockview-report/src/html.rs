//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use mockview_core::model::{QuestionFeedback, SessionFeedback};
use mockview_core::policy::Dimension;

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn score_class(score: f64) -> &'static str {
    if score >= 0.8 {
        "good"
    } else if score >= 0.5 {
        "fair"
    } else {
        "poor"
    }
}

fn push_list(html: &mut String, title: &str, items: &[String]) {
    html.push_str(&format!("<div class=\"card\">\n<h3>{title}</h3>\n"));
    if items.is_empty() {
        html.push_str("<p class=\"meta\">None</p>\n");
    } else {
        html.push_str("<ul>\n");
        for item in items {
            html.push_str(&format!("<li>{}</li>\n", html_escape(item)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
}

/// Generate an HTML report for one session's feedback.
pub fn generate_html(feedback: &SessionFeedback) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>mockview feedback: {}</title>\n",
        html_escape(&feedback.session_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Interview feedback</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Session: <strong>{}</strong> | source: {} | {}</p>\n",
        html_escape(&feedback.session_id),
        feedback.source,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Overview
    html.push_str("<section class=\"dashboard\">\n");
    match feedback.score {
        Some(score) => html.push_str(&format!(
            "<div class=\"badge {}\">{score}<span>/100</span></div>\n",
            score_class(f64::from(score) / 100.0)
        )),
        None => html.push_str("<div class=\"badge none\">n/a</div>\n"),
    }
    html.push_str(&format!(
        "<p class=\"summary\">{}</p>\n",
        html_escape(&feedback.summary)
    ));

    if let Some(metrics) = &feedback.metrics {
        html.push_str("<table class=\"metrics\">\n");
        html.push_str("<thead><tr><th>Answered</th><th>Completeness</th><th>Quality</th></tr></thead>\n");
        html.push_str(&format!(
            "<tbody><tr><td>{}/{}</td><td>{:.0}%</td><td>{:.0}%</td></tr></tbody>\n",
            metrics.answered,
            metrics.total_questions,
            metrics.completeness * 100.0,
            metrics.quality_overall * 100.0,
        ));
        html.push_str("</table>\n");
    }

    if !feedback.per_question.is_empty() {
        html.push_str(&generate_bar_chart(&feedback.per_question));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"lists\">\n");
    push_list(&mut html, "Strengths", &feedback.strengths);
    push_list(&mut html, "Improvements", &feedback.improvements);
    push_list(&mut html, "Suggestions", &feedback.suggestions);
    html.push_str("</section>\n");

    // Per-question breakdown
    if !feedback.per_question.is_empty() {
        html.push_str("<section class=\"results\">\n");
        html.push_str("<h2>Questions</h2>\n");
        html.push_str("<table class=\"results-table\" id=\"results\">\n<thead><tr>");
        html.push_str("<th onclick=\"sortTable(0)\">#</th><th>Question</th><th>Answer</th>");
        for (i, dimension) in Dimension::ALL.iter().enumerate() {
            html.push_str(&format!(
                "<th onclick=\"sortTable({})\">{}</th>",
                i + 3,
                dimension.label()
            ));
        }
        html.push_str(&format!(
            "<th onclick=\"sortTable({})\">Overall</th><th>Tips</th></tr></thead>\n<tbody>\n",
            Dimension::ALL.len() + 3
        ));

        for q in &feedback.per_question {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{} <span class=\"meta\">({} words)</span></td>",
                q.index,
                html_escape(&q.question),
                html_escape(&q.answer_excerpt),
                q.answer_word_count,
            ));
            for dimension in Dimension::ALL {
                let value = q.scores.dimensions.get(dimension);
                html.push_str(&format!(
                    "<td class=\"{}\">{value:.2}</td>",
                    score_class(value)
                ));
            }
            html.push_str(&format!(
                "<td class=\"{}\"><strong>{:.2}</strong></td><td>{}</td></tr>\n",
                score_class(q.scores.overall),
                q.scores.overall,
                q.tips
                    .iter()
                    .map(|t| html_escape(t))
                    .collect::<Vec<_>>()
                    .join("<br>"),
            ));
        }

        html.push_str("</tbody></table>\n");
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(feedback).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file, creating parent directories.
pub fn write_html_report(feedback: &SessionFeedback, path: &Path) -> Result<()> {
    let html = generate_html(feedback);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// One bar per question showing its overall score.
fn generate_bar_chart(questions: &[QuestionFeedback]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 60;

    let total_height = questions.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, q) in questions.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let score = q.scores.overall.clamp(0.0, 1.0);
        let width = (score * max_width as f64) as usize;

        let color = match score_class(score) {
            "good" => "#22c55e",
            "fair" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">Q{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            q.index
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.0}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            score * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --fair: #fef9c3; --poor: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --fair: #713f12; --poor: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.badge { display: inline-block; font-size: 2.5rem; font-weight: bold; padding: 0.5rem 1.5rem; border-radius: 12px; }
.badge span { font-size: 1rem; font-weight: normal; }
.badge.none { background: var(--border); }
.summary { font-size: 1.1rem; }
.lists { display: flex; gap: 1rem; flex-wrap: wrap; }
.card { flex: 1 1 16rem; border: 1px solid var(--border); border-radius: 8px; padding: 0 1rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
.good { background: var(--good); }
.fair { background: var(--fair); }
.poor { background: var(--poor); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = parseFloat(a.cells[col].textContent);
    const vb = parseFloat(b.cells[col].textContent);
    return asc ? va - vb : vb - va;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mockview_core::model::QnAPair;
    use mockview_core::scoring::score_session;

    fn make_feedback() -> SessionFeedback {
        score_session(
            "s-<1>",
            &[
                QnAPair::new(
                    "How would you design a rate limiter?",
                    "I would use a token bucket per client stored in Redis. Each request \
                     takes a token; tokens refill at 100 per second. For example, the API \
                     returned 429 when the bucket was empty.",
                ),
                QnAPair::new("What is <b>eventual</b> consistency?", ""),
            ],
        )
    }

    #[test]
    fn html_report_contains_required_elements() {
        let feedback = make_feedback();
        let html = generate_html(&feedback);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("s-&lt;1&gt;"));
        assert!(html.contains("token bucket"));
        assert!(html.contains("Answered 1 of 2 questions"));
        assert!(html.contains("<th onclick=\"sortTable(7)\">Depth</th>"));
        assert!(html.contains("<svg"));
        assert!(html.contains(&format!("{}<span>/100</span>", feedback.score.unwrap())));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = generate_html(&make_feedback());
        assert!(!html.contains("<b>eventual</b>"));
        assert!(html.contains("&lt;b&gt;eventual&lt;/b&gt;"));
    }

    #[test]
    fn no_data_report_has_no_question_table() {
        let html = generate_html(&SessionFeedback::no_data("empty"));
        assert!(html.contains("n/a"));
        assert!(html.contains("No Q&amp;A found for the provided session."));
        assert!(!html.contains("id=\"results\""));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn html_report_write_to_file() {
        let feedback = make_feedback();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.html");

        write_html_report(&feedback, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
