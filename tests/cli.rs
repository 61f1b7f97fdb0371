use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn bin(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("devbay-assistant").unwrap();
    // Keep a developer's .env or shell from leaking into the run.
    cmd.current_dir(workdir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("RELEVANCE_STRATEGY")
        .env_remove("DEVBAY_CONTENT_PATH")
        .env_remove("CONTEXT_TOP_K")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn no_question_prints_marker_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    bin(dir.path())
        .assert()
        .code(1)
        .stdout("⚠️ Error: No question provided.");
}

#[test]
fn blank_question_counts_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    bin(dir.path())
        .arg("   ")
        .assert()
        .code(1)
        .stdout("⚠️ Error: No question provided.");
}

#[test]
fn missing_content_file_prints_load_marker() {
    let dir = tempfile::tempdir().unwrap();
    bin(dir.path())
        .args(["--content", "/nonexistent/devbay_content.txt"])
        .args(["--strategy", "lexical"])
        .arg("What is Devbay pricing?")
        .assert()
        .code(1)
        .stdout("⚠️ Error: Unable to load content.");
}

#[test]
fn default_content_path_is_relative_to_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    bin(dir.path())
        .arg("What is Devbay pricing?")
        .assert()
        .code(1)
        .stdout("⚠️ Error: Unable to load content.");
}

#[test]
fn missing_api_key_prints_generation_marker() {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("site.txt");
    std::fs::write(&content, "Devbay offers web hosting.\n").unwrap();

    bin(dir.path())
        .arg("--content")
        .arg(&content)
        .args(["--strategy", "lexical", "hosting"])
        .assert()
        .code(1)
        .stdout("⚠️ Error: Unable to generate response.");
}

#[test]
fn unknown_strategy_prints_generation_marker() {
    let dir = tempfile::tempdir().unwrap();
    bin(dir.path())
        .args(["--strategy", "fuzzy", "hosting"])
        .assert()
        .code(1)
        .stdout("⚠️ Error: Unable to generate response.");
}

#[test]
fn diagnostics_stay_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    bin(dir.path())
        .env("RUST_LOG", "debug")
        .args(["--content", "/nonexistent/devbay_content.txt", "hosting"])
        .assert()
        .code(1)
        .stdout("⚠️ Error: Unable to load content.")
        .stderr(predicate::str::contains("run failed"));
}

#[test]
fn unquoted_question_uses_first_word() {
    let dir = tempfile::tempdir().unwrap();
    bin(dir.path())
        .args(["What", "is", "pricing"])
        .assert()
        .code(1)
        .stdout("⚠️ Error: Unable to load content.");
}
