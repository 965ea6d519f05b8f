//! CLI contract: exit codes, stdout/stderr separation, summary shape.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn blockeval() -> Command {
    let mut cmd = Command::cargo_bin("blockeval").unwrap();
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("VITE_GEMINI_API_KEY")
        .env_remove("BLOCKEVAL_GEMINI_URL")
        .env("RUST_LOG", "warn");
    cmd
}

fn write_snapshot(dir: &Path) {
    let rows = [
        ("i am so happy today", 1),
        ("this is wonderful", 1),
        ("i feel so alone", 0),
        ("the noise outside terrifies me", 4),
        ("left over row", 2),
    ];
    let body: String = rows
        .iter()
        .map(|(text, label)| format!("{}\n", json!({"text": text, "label": label})))
        .collect();
    std::fs::write(dir.join("test.jsonl"), body).unwrap();
}

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}]
    })
}

#[test]
fn missing_credential_fails_before_any_work() {
    let tmp = tempdir().unwrap();
    write_snapshot(tmp.path());

    blockeval()
        .args(["run", "--dataset-dir"])
        .arg(tmp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing Gemini API key"));
}

#[test]
fn zero_blocks_reports_no_samples() {
    let tmp = tempdir().unwrap();
    write_snapshot(tmp.path());

    blockeval()
        .args(["run", "--blocks", "0", "--api-key", "k", "--dataset-dir"])
        .arg(tmp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no samples found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_prints_summary_json() {
    let mock_server = MockServer::start().await;
    let reply = json!({
        "block": 1,
        "results": [
            {"local_id": 1, "predicted_emotion": "joy"},
            {"local_id": 2, "predicted_emotion": "happy"},
            {"local_id": 3, "predicted_emotion": "sad"},
            {"local_id": 4, "predicted_emotion": "terrified"}
        ]
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&reply)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tmp = tempdir().unwrap();
    write_snapshot(tmp.path());
    let out_file = tmp.path().join("summary.json");

    let output = blockeval()
        .env("BLOCKEVAL_GEMINI_URL", mock_server.uri())
        .env("GEMINI_API_KEY", "env-key")
        .args(["run", "--blocks", "3", "--dataset-dir"])
        .arg(tmp.path())
        .arg("--output")
        .arg(&out_file)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: Value = serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    assert_eq!(summary["model"], "gemini-2.5-flash");
    assert_eq!(summary["block_size"], 4);
    assert_eq!(summary["blocks_processed"], 1);
    assert_eq!(summary["total_sentences"], 4);
    assert_eq!(summary["correct"], 4);
    assert_eq!(summary["accuracy"], 100.0);
    assert_eq!(summary["results"][3]["predicted_emotion"], "fear");
    assert!(summary["results"][0].get("dataset_index").is_none());

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&out_file).unwrap()).unwrap();
    assert_eq!(written, summary);
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_reply_aborts_with_block_number() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_reply("{\"block\": 1, \"results\": [")),
        )
        .mount(&mock_server)
        .await;

    let tmp = tempdir().unwrap();
    write_snapshot(tmp.path());

    blockeval()
        .env("BLOCKEVAL_GEMINI_URL", mock_server.uri())
        .args(["run", "--api-key", "k", "--dataset-dir"])
        .arg(tmp.path())
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("block 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn model_failure_aborts_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&mock_server)
        .await;

    let tmp = tempdir().unwrap();
    write_snapshot(tmp.path());

    blockeval()
        .env("BLOCKEVAL_GEMINI_URL", mock_server.uri())
        .args(["run", "--api-key", "k", "--dataset-dir"])
        .arg(tmp.path())
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("model request failed for block 1"));
}

#[test]
fn score_recomputes_accuracy() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("summary.json");
    std::fs::write(
        &file,
        json!({
            "model": "gemini-2.5-flash",
            "accuracy": 50.0,
            "results": [
                {"sentence": "a", "gold_emotion": "joy", "predicted_emotion": "joy"},
                {"sentence": "b", "gold_emotion": "fear", "predicted_emotion": "anger"}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let output = blockeval().arg("score").arg(&file).output().unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["accuracy"], 50.0);
    assert_eq!(report["consistent"], true);
}

#[test]
fn score_rejects_non_list_results() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("summary.json");
    std::fs::write(&file, "{\"results\": {}}").unwrap();

    blockeval()
        .arg("score")
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'results' to be a list"));
}

#[test]
fn version_prints_crate_version() {
    blockeval()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
