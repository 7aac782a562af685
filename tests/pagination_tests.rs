mod common;

use std::time::Duration;

use common::{BASE_URL, harness, harness_with, ok_json, status, test_config, throttled};
use serde_json::json;
use slack_exporter::core::config::AppConfig;
use slack_exporter::core::models::Message;
use slack_exporter::errors::ExportError;
use slack_exporter::slack::{Fetcher, root_timestamps};

fn message(ts: &str) -> serde_json::Value {
    json!({"type": "message", "ts": ts, "user": "U1", "text": ts})
}

#[tokio::test]
async fn pages_are_concatenated_in_server_order() {
    let h = harness(vec![
        ok_json(json!({
            "ok": true,
            "channels": [{"id": "C1"}, {"id": "C2"}],
            "response_metadata": {"next_cursor": "page2"}
        })),
        ok_json(json!({
            "ok": true,
            "channels": [{"id": "C3"}],
            "response_metadata": {"next_cursor": ""}
        })),
    ]);

    let channels = h.exporter.list_channels(None).await.unwrap();
    let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["C1", "C2", "C3"]);

    let calls = h.transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].url, format!("{BASE_URL}/conversations.list"));
    assert_eq!(calls[0].param("cursor"), None);
    assert_eq!(calls[0].param("limit"), Some("200"));
    assert_eq!(
        calls[0].param("types"),
        Some("public_channel,private_channel,mpim,im")
    );
    assert_eq!(calls[0].param("team_id"), None);
    assert_eq!(calls[1].param("cursor"), Some("page2"));
    assert_eq!(calls[0].token, "xoxp-test");
}

#[tokio::test]
async fn whitespace_cursor_ends_pagination() {
    let h = harness(vec![ok_json(json!({
        "ok": true,
        "members": [{"id": "U1", "name": "alice"}],
        "response_metadata": {"next_cursor": "   "}
    }))]);

    let users = h.exporter.list_users(Some("T1")).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(h.transport.calls().len(), 1);
    assert_eq!(h.transport.calls()[0].param("team_id"), Some("T1"));
}

#[tokio::test]
async fn api_error_is_announced_and_returned() {
    let h = harness(vec![ok_json(json!({"ok": false, "error": "not_in_channel"}))]);

    let err = h.exporter.get_history("C1", None, None).await.unwrap_err();
    assert!(matches!(&err, ExportError::Api(code) if code == "not_in_channel"));
    assert_eq!(
        h.announcer.messages(),
        vec!["I encountered an error: not_in_channel".to_string()]
    );
}

#[tokio::test]
async fn error_on_a_later_page_discards_earlier_pages() {
    let h = harness(vec![
        ok_json(json!({
            "ok": true,
            "messages": [message("2.0")],
            "response_metadata": {"next_cursor": "next"}
        })),
        status(500, "Internal Server Error"),
    ]);

    let err = h.exporter.get_history("C1", None, None).await.unwrap_err();
    assert!(matches!(err, ExportError::Http { status: 500, .. }));
    assert_eq!(
        h.announcer.messages(),
        vec!["ERROR: 500 Internal Server Error".to_string()]
    );
}

#[tokio::test]
async fn missing_collection_key_is_reported() {
    let h = harness(vec![ok_json(json!({"ok": true}))]);

    let err = h.exporter.list_users(None).await.unwrap_err();
    assert!(matches!(err, ExportError::MissingField(_)));
    assert_eq!(h.announcer.messages().len(), 1);
    assert!(h.announcer.messages()[0].starts_with("Something went wrong: 'members'"));
}

#[tokio::test]
async fn network_failure_is_announced() {
    let h = harness(vec![]);

    let err = h.exporter.list_channels(None).await.unwrap_err();
    assert!(matches!(err, ExportError::Transport(_)));
    assert_eq!(h.announcer.messages().len(), 1);
}

#[tokio::test]
async fn history_bounds_are_sent_only_when_given() {
    let h = harness(vec![
        ok_json(json!({"ok": true, "messages": []})),
        ok_json(json!({"ok": true, "messages": []})),
    ]);

    h.exporter.get_history("C1", None, None).await.unwrap();
    h.exporter
        .get_history("C1", Some("1500000000"), Some("1600000000"))
        .await
        .unwrap();

    let calls = h.transport.calls();
    assert_eq!(calls[0].param("oldest"), None);
    assert_eq!(calls[0].param("latest"), None);
    assert_eq!(calls[0].param("channel"), Some("C1"));
    assert_eq!(calls[1].param("oldest"), Some("1500000000"));
    assert_eq!(calls[1].param("latest"), Some("1600000000"));
}

#[tokio::test]
async fn throttled_request_sleeps_retry_after_plus_margin() {
    let h = harness(vec![
        throttled(Some(3)),
        ok_json(json!({"ok": true, "members": []})),
    ]);

    h.exporter.list_users(None).await.unwrap();

    assert_eq!(h.sleeper.slept(), vec![Duration::from_secs(5)]);
    assert_eq!(h.transport.calls().len(), 2);
    assert_eq!(h.transport.calls()[0], h.transport.calls()[1]);
}

#[tokio::test]
async fn missing_retry_after_defaults_to_one_second() {
    let h = harness(vec![throttled(None), ok_json(json!({"ok": true, "members": []}))]);

    h.exporter.list_users(None).await.unwrap();
    assert_eq!(h.sleeper.slept(), vec![Duration::from_secs(3)]);
}

#[tokio::test]
async fn throttling_is_bounded() {
    let mut config = test_config();
    config.rate_limit_max_attempts = 3;
    let h = harness_with(
        &config,
        vec![throttled(Some(1)), throttled(Some(1)), throttled(Some(1))],
    );

    let err = h.exporter.list_channels(None).await.unwrap_err();
    assert!(matches!(err, ExportError::RateLimited { attempts: 3 }));
    assert_eq!(h.sleeper.slept().len(), 2);
    assert_eq!(h.transport.calls().len(), 3);
}

#[tokio::test]
async fn replies_follow_input_order_with_root_first() {
    let h = harness(vec![
        ok_json(json!({"ok": true, "messages": [
            {"type": "message", "ts": "10.0", "reply_count": 1},
            {"type": "message", "ts": "11.0", "parent_user_id": "U1"}
        ]})),
        ok_json(json!({"ok": true, "messages": [
            {"type": "message", "ts": "20.0", "reply_count": 1},
            {"type": "message", "ts": "21.0", "parent_user_id": "U2"}
        ]})),
    ]);

    let threads = h
        .exporter
        .get_replies(&["10.0".to_string(), "20.0".to_string()], "C1")
        .await
        .unwrap();

    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0][0].ts, "10.0");
    assert_eq!(threads[1][0].ts, "20.0");
    assert!(threads[1][1].is_reply());

    let calls = h.transport.calls();
    assert_eq!(calls[0].url, format!("{BASE_URL}/conversations.replies"));
    assert_eq!(calls[0].param("ts"), Some("10.0"));
    assert_eq!(calls[1].param("ts"), Some("20.0"));
}

#[tokio::test]
async fn unknown_fields_survive_a_round_trip() {
    let h = harness(vec![ok_json(json!({"ok": true, "messages": [
        {"type": "message", "ts": "1.0", "blocks": [{"type": "rich_text"}], "edited": {"ts": "2.0"}}
    ]}))]);

    let history = h.exporter.get_history("C1", None, None).await.unwrap();
    let value = serde_json::to_value(&history).unwrap();
    assert_eq!(
        value,
        json!([{"type": "message", "ts": "1.0", "blocks": [{"type": "rich_text"}], "edited": {"ts": "2.0"}}])
    );
}

#[test]
fn root_timestamps_keep_only_thread_roots() {
    let messages: Vec<Message> = serde_json::from_value(json!([
        {"ts": "1.0", "reply_count": 2},
        {"ts": "2.0"},
        {"ts": "3.0", "reply_count": 0},
        {"ts": "4.0", "reply_count": null}
    ]))
    .unwrap();
    let roots: Vec<String> = root_timestamps(&messages);
    assert_eq!(roots, vec!["1.0".to_string()]);
}

#[tokio::test]
async fn explicit_nulls_survive_json_export() {
    let h = harness(vec![
        ok_json(json!({
            "ok": true,
            "messages": [
                {"type": "message", "ts": "1.0", "text": "hi", "user": null, "files": null}
            ]
        })),
        ok_json(json!({
            "ok": true,
            "members": [{"id": "U1", "is_bot": false, "tz": null, "profile": {"real_name": null}}]
        })),
    ]);

    let history = h.exporter.get_history("C1", None, None).await.unwrap();
    assert_eq!(
        serde_json::to_value(&history).unwrap(),
        json!([{"type": "message", "ts": "1.0", "text": "hi", "user": null, "files": null}])
    );
    assert_eq!(history[0].user(), None);
    assert_eq!(history[0].files(), None);

    let users = h.exporter.list_users(None).await.unwrap();
    assert_eq!(
        serde_json::to_value(&users).unwrap(),
        json!([{"id": "U1", "is_bot": false, "tz": null, "profile": {"real_name": null}}])
    );
    assert_eq!(users[0].tz(), None);
    assert_eq!(users[0].full_name(), None);
}

#[test]
fn blank_token_is_a_configuration_error() {
    let config = AppConfig::with_token("  ");
    let err = Fetcher::new(&config).err().unwrap();
    assert!(matches!(err, ExportError::Config(_)));
}
