use std::io::Write;
use std::sync::Arc;

use serde_json::json;
use speakable_hook::config::Config;
use speakable_hook::context::recent_context;
use speakable_hook::debug_log::{FileLog, MemoryLog};
use speakable_hook::dispatch::Dispatcher;
use speakable_hook::hook::{run_stop_hook, HookOutcome, SkipReason};
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT_PATH: &str = "/api/speakable";

fn create_test_jsonl(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn dispatcher_for(server: &MockServer, log: &MemoryLog) -> Dispatcher {
    Dispatcher::new(
        format!("{}{ENDPOINT_PATH}", server.uri()),
        Arc::new(log.clone()),
    )
}

#[tokio::test]
async fn speaks_last_assistant_message_with_correlation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(body_json(json!({"text": "Done.", "session_id": "s1", "cwd": "/work"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let transcript = create_test_jsonl(&[
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Done."}]}}"#,
    ]);
    let input = json!({
        "transcript_path": transcript.path(),
        "session_id": "s1",
        "cwd": "/work",
    })
    .to_string();

    let log = MemoryLog::new();
    let outcome = run_stop_hook(
        &input,
        &Config::default(),
        &dispatcher_for(&server, &log),
        &log,
    )
    .await;

    assert_eq!(outcome, HookOutcome::Dispatched { text_chars: 5 });
    assert_eq!(log.find("dispatch_response").unwrap()["status"], 200);
}

#[tokio::test]
async fn stop_hook_active_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let transcript = create_test_jsonl(&[
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Done."}]}}"#,
    ]);
    let input = json!({
        "transcript_path": transcript.path(),
        "stop_hook_active": true,
    })
    .to_string();

    let log = MemoryLog::new();
    let outcome = run_stop_hook(
        &input,
        &Config::default(),
        &dispatcher_for(&server, &log),
        &log,
    )
    .await;

    assert_eq!(outcome, HookOutcome::Skipped(SkipReason::StopHookActive));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn tool_only_transcript_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let transcript = create_test_jsonl(&[
        r#"{"type":"user","message":{"role":"user","content":"List files"}}"#,
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"thinking","thinking":"ls"},{"type":"tool_use","id":"1","name":"Bash","input":{"command":"ls"}}]}}"#,
        r#"{"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"1","content":"a.txt"}]}}"#,
    ]);
    let input = json!({ "transcript_path": transcript.path() }).to_string();

    let log = MemoryLog::new();
    let outcome = run_stop_hook(
        &input,
        &Config::default(),
        &dispatcher_for(&server, &log),
        &log,
    )
    .await;

    assert_eq!(outcome, HookOutcome::Skipped(SkipReason::NoAssistantText));
}

#[tokio::test]
async fn delivery_failure_still_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let transcript = create_test_jsonl(&[
        "not json at all",
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"First"},{"type":"tool_use","id":"1","name":"Edit","input":{}},{"type":"text","text":"Second"}]}}"#,
    ]);
    let input = json!({ "transcript_path": transcript.path() }).to_string();

    let log = MemoryLog::new();
    let outcome = run_stop_hook(
        &input,
        &Config::default(),
        &dispatcher_for(&server, &log),
        &log,
    )
    .await;

    assert_eq!(
        outcome,
        HookOutcome::Dispatched {
            text_chars: "First\nSecond".len()
        }
    );
    assert_eq!(log.find("dispatch_error").unwrap()["status"], 500);
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"text": "First\nSecond"}));
}

#[tokio::test]
async fn transcript_path_expands_home() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"text": "From home"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(home.path().join("projects")).unwrap();
    std::fs::write(
        home.path().join("projects/t.jsonl"),
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"From home"}]}}"#,
    )
    .unwrap();

    let config = Config {
        home: Some(home.path().to_path_buf()),
        ..Config::default()
    };
    let log = MemoryLog::new();
    let input = r#"{"transcript_path":"~/projects/t.jsonl"}"#;
    let outcome = run_stop_hook(input, &config, &dispatcher_for(&server, &log), &log).await;

    assert!(matches!(outcome, HookOutcome::Dispatched { .. }));
}

#[tokio::test]
async fn debug_file_records_each_step() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"spoken": "Done"})))
        .mount(&server)
        .await;

    let transcript = create_test_jsonl(&[
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Done."}]}}"#,
    ]);
    let logs = tempfile::tempdir().unwrap();
    let log = Arc::new(FileLog::new(logs.path().join("hook.log")));
    let dispatcher = Dispatcher::new(format!("{}{ENDPOINT_PATH}", server.uri()), log.clone());
    let input = json!({ "transcript_path": transcript.path() }).to_string();

    run_stop_hook(&input, &Config::default(), &dispatcher, &*log).await;

    let contents = std::fs::read_to_string(log.path()).unwrap();
    for label in [
        "hook_input",
        "last_assistant",
        "dispatch_request",
        "dispatch_response",
        "hook_complete",
    ] {
        assert!(
            contents.contains(&format!("] {label}: ")),
            "missing {label} in debug log:\n{contents}"
        );
    }
}

#[tokio::test]
async fn recent_context_payload_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "text": "User: Fix the bug\n\n---\n\nAssistant: Fixed it.",
            "session_id": "ctx",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transcript = create_test_jsonl(&[
        r#"{"type":"user","message":{"role":"user","content":"Fix the bug"}}"#,
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"tool_use","id":"1","name":"Edit","input":{}}]}}"#,
        r#"{"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"1","content":"ok"}]}}"#,
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Fixed it."}]}}"#,
    ]);

    let log = MemoryLog::new();
    let context = recent_context(transcript.path(), 4, &Config::default(), &log);
    assert_eq!(context.turns.len(), 2);

    let payload = context.into_payload(Some("ctx".into()), None);
    dispatcher_for(&server, &log).dispatch(&payload).await;
}
