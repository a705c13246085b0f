//! The `mockview feedback` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use mockview_core::engine::FeedbackEngine;
use mockview_core::model::SessionFeedback;
use mockview_core::policy::Dimension;
use mockview_core::store::JsonFileStore;
use mockview_providers::config::load_config_from;
use mockview_report::{generate_html, generate_markdown, write_html_report, write_markdown_report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
    Markdown,
    Html,
}

impl Format {
    fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "markdown" | "md" => Ok(Format::Markdown),
            "html" => Ok(Format::Html),
            other => anyhow::bail!("unknown format '{other}' (expected text, json, markdown, html)"),
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Json => "json",
            Format::Markdown => "md",
            Format::Html => "html",
        }
    }
}

pub async fn execute(
    sessions: String,
    heuristic_only: bool,
    format: String,
    output: Option<PathBuf>,
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let format = Format::parse(&format)?;
    let session_ids: Vec<String> = sessions
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    anyhow::ensure!(!session_ids.is_empty(), "at least one session id is required");
    if output.is_some() && session_ids.len() > 1 {
        for id in &session_ids {
            report_file_name(id, format)?;
        }
    }

    let config = load_config_from(config_path.as_deref())?;
    let store_path = store_path.unwrap_or_else(|| config.store_path.clone());
    let store = Arc::new(JsonFileStore::new(store_path));

    let mut engine = FeedbackEngine::new(store, config.engine_config());
    if !heuristic_only && config.use_model_feedback {
        match config.provider(None)? {
            Some(provider) => {
                tracing::info!(provider = provider.name(), "using model feedback");
                engine = engine.with_provider(Arc::from(provider));
            }
            None => tracing::info!(
                "no usable provider '{}'; using heuristic scoring",
                config.default_provider
            ),
        }
    }

    let results = engine.feedback_for_sessions(&session_ids).await;

    let mut feedbacks = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (session_id, result) in results {
        match result {
            Ok(feedback) => feedbacks.push(feedback),
            Err(e) => {
                eprintln!("Error: session {session_id}: {e:#}");
                failed += 1;
            }
        }
    }

    match &output {
        Some(path) => write_outputs(&feedbacks, session_ids.len(), format, path)?,
        None => print_outputs(&feedbacks, format)?,
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} session(s) failed", session_ids.len());
    }
    Ok(())
}

fn render(feedback: &SessionFeedback, format: Format) -> Result<String> {
    Ok(match format {
        Format::Text => render_text(feedback),
        Format::Json => serde_json::to_string_pretty(feedback)?,
        Format::Markdown => generate_markdown(feedback),
        Format::Html => generate_html(feedback),
    })
}

fn print_outputs(feedbacks: &[SessionFeedback], format: Format) -> Result<()> {
    if format == Format::Json && feedbacks.len() > 1 {
        println!("{}", serde_json::to_string_pretty(feedbacks)?);
        return Ok(());
    }
    for feedback in feedbacks {
        println!("{}", render(feedback, format)?);
    }
    Ok(())
}

/// File name for one session's report inside an output directory.
fn report_file_name(session_id: &str, format: Format) -> Result<String> {
    anyhow::ensure!(
        !session_id.contains(['/', '\\']) && !session_id.contains(".."),
        "session id '{session_id}' cannot be used as a file name"
    );
    Ok(format!("{session_id}.{}", format.extension()))
}

/// One requested session writes to `path`; several write `<path>/<session>.<ext>`,
/// even when some of them failed.
fn write_outputs(
    feedbacks: &[SessionFeedback],
    requested: usize,
    format: Format,
    path: &Path,
) -> Result<()> {
    for feedback in feedbacks {
        let target = if requested == 1 {
            path.to_path_buf()
        } else {
            path.join(report_file_name(&feedback.session_id, format)?)
        };

        match format {
            Format::Html => write_html_report(feedback, &target)?,
            Format::Markdown => write_markdown_report(feedback, &target)?,
            Format::Text | Format::Json => {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(&target, render(feedback, format)?)
                    .with_context(|| format!("failed to write {}", target.display()))?;
            }
        }
        eprintln!("Feedback for {} written to: {}", feedback.session_id, target.display());
    }
    Ok(())
}

fn render_text(feedback: &SessionFeedback) -> String {
    use comfy_table::{Cell, Table};
    use std::fmt::Write as _;

    let mut out = String::new();
    let score = feedback
        .score
        .map(|s| format!("{s}/100"))
        .unwrap_or_else(|| "n/a".to_string());
    let _ = writeln!(
        out,
        "Session {}: {score} ({})",
        feedback.session_id, feedback.source
    );
    let _ = writeln!(out, "{}", feedback.summary);

    if let Some(m) = &feedback.metrics {
        let _ = writeln!(
            out,
            "Answered {}/{} | completeness {:.2} | quality {:.2}",
            m.answered, m.total_questions, m.completeness, m.quality_overall
        );
    }

    for (title, items) in [
        ("Strengths", &feedback.strengths),
        ("Improvements", &feedback.improvements),
        ("Suggestions", &feedback.suggestions),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{title}:");
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }

    if !feedback.per_question.is_empty() {
        let mut table = Table::new();
        let mut header = vec!["#".to_string(), "Question".to_string()];
        header.extend(Dimension::ALL.iter().map(|d| d.label().to_string()));
        header.push("Overall".to_string());
        table.set_header(header);

        for q in &feedback.per_question {
            let mut row = vec![Cell::new(q.index), Cell::new(&q.question)];
            row.extend(
                Dimension::ALL
                    .iter()
                    .map(|d| Cell::new(format!("{:.2}", q.scores.dimensions.get(*d)))),
            );
            row.push(Cell::new(format!("{:.2}", q.scores.overall)));
            table.add_row(row);
        }
        let _ = writeln!(out, "\n{table}");
    }

    out
}
