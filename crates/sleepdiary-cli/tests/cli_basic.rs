//! End-to-end tests driving the compiled CLI binary.

use std::path::{Path, PathBuf};
use std::process::Command;

fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "sleepdiary-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn morning_questions_json() -> &'static str {
    r#"[
        {"id": "q1", "type": "multiple_choice_multiple", "order": 1,
         "text": "Medication taken?",
         "options": [
            {"id": "med_none", "text": "None"},
            {"id": "med_other", "text": "Other", "isOther": true}
         ]},
        {"id": "q2", "type": "text", "order": 2, "text": "Daytime activity"},
        {"id": "q3", "type": "time_picker", "order": 3, "text": "Went to bed"},
        {"id": "q4", "type": "time_picker", "order": 4, "text": "Lights off"},
        {"id": "q5", "type": "numeric", "order": 5, "text": "Minutes to fall asleep"},
        {"id": "q6", "type": "multiple_choice", "order": 6,
         "text": "Did you wake during the night?",
         "options": [
            {"id": "wake_yes", "text": "Yes"},
            {"id": "wake_no", "text": "No"}
         ],
         "conditionalChildren": [
            {"optionId": "wake_yes", "childQuestionId": "q7"},
            {"optionId": "wake_yes", "childQuestionId": "q8"}
         ]},
        {"id": "q7", "type": "numeric", "order": 7, "text": "How many times?"},
        {"id": "q8", "type": "numeric", "order": 8, "text": "Minutes awake"},
        {"id": "q9", "type": "time_picker", "order": 9, "text": "Woke up"},
        {"id": "q10", "type": "time_picker", "order": 10, "text": "Out of bed"},
        {"id": "q11", "type": "slider", "order": 11, "text": "Morning mood",
         "minValue": 1, "maxValue": 5}
    ]"#
}

fn good_answers_json() -> &'static str {
    r#"{
        "q1": ["med_none"],
        "q2": "evening walk",
        "q3": "23:00",
        "q4": "23:10",
        "q5": 15,
        "q6": {"optionId": "wake_no"},
        "q9": "07:00",
        "q10": "07:20",
        "q11": 4
    }"#
}

fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn test_inspect_prints_main_line_and_edges() {
    let dir = tempfile::tempdir().unwrap();
    let questions = write_fixture(dir.path(), "questions.json", morning_questions_json());

    let (stdout, _, code) = run_cli(&["inspect", questions.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("main line (9 questions)"));
    assert!(stdout.contains("wake_yes -> q7"));
    assert!(stdout.contains("conditional questions: q7, q8"));
}

#[test]
fn test_check_passes_consistent_answers() {
    let dir = tempfile::tempdir().unwrap();
    let questions = write_fixture(dir.path(), "questions.json", morning_questions_json());
    let answers = write_fixture(dir.path(), "answers.json", good_answers_json());

    let (stdout, _, code) = run_cli(&[
        "check",
        questions.to_str().unwrap(),
        answers.to_str().unwrap(),
        "--questionnaire",
        "morning",
        "--locale",
        "en",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("progress: 9/9 (100%)"));
}

#[test]
fn test_check_fails_on_time_rule_violation() {
    let dir = tempfile::tempdir().unwrap();
    let questions = write_fixture(dir.path(), "questions.json", morning_questions_json());
    let bad = good_answers_json().replace("\"q4\": \"23:10\"", "\"q4\": \"22:30\"");
    let answers = write_fixture(dir.path(), "answers.json", &bad);

    let (stdout, stderr, code) = run_cli(&[
        "check",
        questions.to_str().unwrap(),
        answers.to_str().unwrap(),
        "--questionnaire",
        "morning",
        "--locale",
        "en",
    ]);
    assert_ne!(code, 0);
    assert!(stdout.contains("rule lights-off"));
    assert!(stderr.contains("rule violation"));
}

#[test]
fn test_run_replays_and_submits() {
    let dir = tempfile::tempdir().unwrap();
    let questions = write_fixture(dir.path(), "questions.json", morning_questions_json());
    let answers = write_fixture(dir.path(), "answers.json", good_answers_json());

    let (stdout, _, code) = run_cli(&[
        "run",
        questions.to_str().unwrap(),
        answers.to_str().unwrap(),
        "--questionnaire",
        "morning",
        "--locale",
        "en",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("completed: 9/9 (100%)"));
    assert!(stdout.contains("submitted response"));
}

#[test]
fn test_run_reports_missing_answer() {
    let dir = tempfile::tempdir().unwrap();
    let questions = write_fixture(dir.path(), "questions.json", morning_questions_json());
    let partial = r#"{"q1": ["med_none"]}"#;
    let answers = write_fixture(dir.path(), "answers.json", partial);

    let (_, stderr, code) = run_cli(&[
        "run",
        questions.to_str().unwrap(),
        answers.to_str().unwrap(),
        "--questionnaire",
        "morning",
        "--locale",
        "en",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no saved answer for question q2"));
}
