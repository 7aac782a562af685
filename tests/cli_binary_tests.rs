use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_cli(server: &MockServer, args: &[&str]) -> Output {
    let base = format!("{}/api", server.uri());
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    let work = tempfile::tempdir().unwrap();
    let cwd = work.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_slack-exporter"))
            .args(&args)
            .current_dir(&cwd)
            .env("SLACK_USER_TOKEN", "xoxp-test")
            .env("SLACK_API_BASE_URL", base)
            .env("SLACK_RATE_LIMIT_MARGIN_SECS", "0")
            .env("RUST_LOG", "info")
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn api_failure_is_reported_once_and_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users.list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "invalid_auth"})),
        )
        .mount(&server)
        .await;

    let output = run_cli(&server, &["--lu"]).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    // One announcement, plus the exit report from `main`.
    assert_eq!(stderr.matches("invalid_auth").count(), 2, "stderr: {stderr}");
    assert!(stderr.contains("Error: I encountered an error: invalid_auth"));
}
