//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `mockview` command isolated from the caller's keys and config.
fn mockview(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("mockview").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("MOCKVIEW_STORE_PATH")
        .env_remove("RUST_LOG");
    cmd
}

fn record(dir: &Path, session: &str, question: &str, answer: &str) {
    mockview(dir)
        .args(["record", "--session", session, "--question", question])
        .args(["--answer", answer, "--store", "records.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("for session {session}")));
}

fn write_config(dir: &Path, body: &str) {
    std::fs::write(dir.join("mockview.toml"), body).unwrap();
}

fn mock_config(response: &str) -> String {
    format!(
        "default_provider = \"offline\"\nstore_path = \"records.json\"\n\n\
         [providers.offline]\ntype = \"mock\"\nresponse = '{response}'\n"
    )
}

fn feedback_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = mockview(dir)
        .args(["feedback", "--format", "json", "--store", "records.json"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

const GOOD_ANSWER: &str = "In my last role the situation was a slow checkout service. \
    My task was to cut latency. I profiled the service, cached a JOIN-heavy query, \
    and added retries with backoff. As a result latency dropped by 60 percent.";

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created mockview.toml"));

    let content = std::fs::read_to_string(dir.path().join("mockview.toml")).unwrap();
    assert!(content.contains("type = \"gemini\""));

    mockview(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn record_assigns_increasing_ids() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .args(["record", "--session", "s1", "--question", "Q1?", "--answer", "A1"])
        .args(["--store", "data/records.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded row 1 for session s1"));

    mockview(dir.path())
        .args(["record", "--session", "s1", "--question", "Q2?"])
        .args(["--store", "data/records.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded row 2 for session s1"));

    assert!(dir.path().join("data/records.json").exists());
}

#[test]
fn record_rejects_blank_session() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .args(["record", "--session", "  ", "--question", "Q?"])
        .args(["--store", "records.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session id must not be empty"));
}

#[test]
fn heuristic_feedback_as_json() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "s1", "How did you improve checkout latency?", GOOD_ANSWER);
    record(dir.path(), "s1", "What is eventual consistency?", "");

    let json = feedback_json(dir.path(), &["--session", "s1", "--heuristic-only"]);

    assert_eq!(json["session_id"], "s1");
    assert_eq!(json["source"], "heuristic");
    assert_eq!(json["metrics"]["total_questions"], 2);
    assert_eq!(json["metrics"]["answered"], 1);
    assert_eq!(json["metrics"]["completeness"], 0.5);
    assert_eq!(json["per_question"].as_array().unwrap().len(), 2);
    assert_eq!(json["strengths"][0], "Answered 1 of 2 questions");
    assert_eq!(
        json["improvements"][0],
        "Answer all questions for better completeness"
    );
    let score = json["score"].as_u64().unwrap();
    assert!(score > 0 && score <= 100);
}

#[test]
fn unknown_session_has_no_data() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "s1", "Q?", "A");

    let json = feedback_json(dir.path(), &["--session", "missing", "--heuristic-only"]);

    assert_eq!(json["score"], serde_json::Value::Null);
    assert_eq!(json["summary"], "No Q&A found for the provided session.");
    assert_eq!(json["source"], "no_data");
    assert!(json.get("per_question").is_none());
}

#[test]
fn missing_store_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let json = feedback_json(dir.path(), &["--session", "s1", "--heuristic-only"]);
    assert_eq!(json["source"], "no_data");
}

#[test]
fn no_provider_configured_falls_back_to_heuristic() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);

    let json = feedback_json(dir.path(), &["--session", "s1"]);
    assert_eq!(json["source"], "heuristic");
}

#[test]
fn model_feedback_from_mock_provider() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        &mock_config(
            r#"{"score": 88, "summary": "Strong session.", "strengths": ["Clear"], "improvements": [], "suggestions": ["Keep going"]}"#,
        ),
    );
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);

    let json = feedback_json(dir.path(), &["--session", "s1"]);
    assert_eq!(json["source"], "model");
    assert_eq!(json["score"], 88);
    assert_eq!(json["summary"], "Strong session.");
    assert_eq!(json["strengths"][0], "Clear");

    let heuristic = feedback_json(dir.path(), &["--session", "s1", "--heuristic-only"]);
    assert_eq!(heuristic["source"], "heuristic");
}

#[test]
fn non_json_model_reply_is_returned_raw() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), &mock_config("Sorry, I cannot help with that."));
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);

    let json = feedback_json(dir.path(), &["--session", "s1"]);
    assert_eq!(json["source"], "model_fallback");
    assert_eq!(json["score"], serde_json::Value::Null);
    assert_eq!(json["summary"], "Sorry, I cannot help with that.");
}

#[test]
fn failing_provider_degrades_to_heuristic() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        "default_provider = \"offline\"\n\n[providers.offline]\ntype = \"mock\"\nfail = true\n",
    );
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);

    let json = feedback_json(dir.path(), &["--session", "s1"]);
    assert_eq!(json["source"], "heuristic");
}

#[test]
fn several_sessions_keep_input_order() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "b", "Q?", GOOD_ANSWER);
    record(dir.path(), "a", "Q?", "");

    let json = feedback_json(dir.path(), &["--session", "b, nope ,a", "--heuristic-only"]);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["session_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["b", "nope", "a"]);
}

#[test]
fn text_output_has_question_table() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);

    mockview(dir.path())
        .args(["feedback", "--session", "s1", "--heuristic-only"])
        .args(["--store", "records.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session s1:"))
        .stdout(predicate::str::contains("(heuristic)"))
        .stdout(predicate::str::contains("Keywords"))
        .stdout(predicate::str::contains("Why Rust?"));
}

#[test]
fn html_report_written_to_file() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);

    mockview(dir.path())
        .args(["feedback", "--session", "s1", "--heuristic-only"])
        .args(["--store", "records.json", "--format", "html"])
        .args(["--output", "out/s1.html"])
        .assert()
        .success()
        .stderr(predicate::str::contains("written to"));

    let html = std::fs::read_to_string(dir.path().join("out/s1.html")).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("Why Rust?"));
}

#[test]
fn markdown_reports_per_session_in_directory() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);
    record(dir.path(), "s2", "Why Go?", "");

    mockview(dir.path())
        .args(["feedback", "--session", "s1,s2", "--heuristic-only"])
        .args(["--store", "records.json", "--format", "markdown"])
        .args(["--output", "reports"])
        .assert()
        .success();

    let s1 = std::fs::read_to_string(dir.path().join("reports/s1.md")).unwrap();
    assert!(s1.starts_with("# Interview feedback: s1"));
    assert!(dir.path().join("reports/s2.md").exists());
}

#[test]
fn session_ids_cannot_escape_the_output_directory() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "s1", "Why Rust?", GOOD_ANSWER);

    mockview(dir.path())
        .args(["feedback", "--session", "../x,s1", "--heuristic-only"])
        .args(["--store", "records.json", "--format", "json"])
        .args(["--output", "reports"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used as a file name"));

    assert!(!dir.path().join("x.json").exists());
    assert!(!dir.path().join("reports").exists());
}

#[test]
fn unknown_format_is_rejected() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .args(["feedback", "--session", "s1", "--format", "sarif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn corrupt_store_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("records.json"), "{not json").unwrap();

    mockview(dir.path())
        .args(["feedback", "--session", "s1", "--heuristic-only"])
        .args(["--store", "records.json", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt"));
}

#[test]
fn questions_from_mock_provider() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        &mock_config(r#"["What is ownership?", "How do you test async code?"]"#),
    );

    mockview(dir.path())
        .args(["questions", "--role", "Rust Engineer", "--skills", "rust,tokio"])
        .args(["--experience", "3", "--count", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. What is ownership?"))
        .stdout(predicate::str::contains("2. How do you test async code?"));
}

#[test]
fn questions_without_provider_fail() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .args(["questions", "--role", "Rust Engineer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no model provider available"));
}

#[test]
fn list_models_for_configured_providers() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        "default_provider = \"offline\"\n\n\
         [providers.offline]\ntype = \"mock\"\n\n\
         [providers.gemini]\ntype = \"gemini\"\napi_key = \"${_MOCKVIEW_UNSET_KEY}\"\n",
    );

    mockview(dir.path())
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: offline (default)"))
        .stdout(predicate::str::contains("mock-model"))
        .stdout(predicate::str::contains("Provider: gemini [no API key]"))
        .stdout(predicate::str::contains("gemini-1.5-flash"));
}

#[test]
fn list_models_without_config() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .args(["list-models", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn sessions_lists_ids_in_first_seen_order() {
    let dir = TempDir::new().unwrap();
    record(dir.path(), "beta", "Q?", "A");
    record(dir.path(), "alpha", "Q?", "A");
    record(dir.path(), "beta", "Q2?", "A");

    mockview(dir.path())
        .args(["sessions", "--store", "records.json"])
        .assert()
        .success()
        .stdout("beta\nalpha\n");
}
