use slack_exporter::api::parsing::{
    REQUIRED_FIELDS, SlashCommand, decode_url_component, parse_form, parse_slash_command,
};
use slack_exporter::core::models::{ExportKind, ExportMode};
use slack_exporter::errors::ExportError;

const FULL: &str = "token=abc123&team_id=T123&team_domain=example&channel_id=C123&\
                    channel_name=general&user_id=U123&user_name=username&\
                    command=%2Fexport-channel&text=Text&\
                    response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1&\
                    trigger_id=123.456";

#[test]
fn test_parse_full_command() {
    let command = parse_slash_command(FULL).unwrap();
    assert_eq!(
        command,
        SlashCommand {
            team_id: "T123".into(),
            team_domain: "example".into(),
            channel_id: "C123".into(),
            channel_name: "general".into(),
            response_url: "https://hooks.slack.com/commands/1".into(),
            text: "Text".into(),
        }
    );
}

#[test]
fn test_each_required_field_is_enforced() {
    for field in REQUIRED_FIELDS {
        let body: String = FULL
            .split('&')
            .filter(|pair| !pair.starts_with(&format!("{field}=")))
            .collect::<Vec<_>>()
            .join("&");
        let err = parse_slash_command(&body).unwrap_err();
        match err {
            ExportError::MissingField(detail) => assert!(detail.contains(field)),
            other => panic!("unexpected error for {field}: {other}"),
        }
    }
}

#[test]
fn test_empty_text_is_present_not_missing() {
    let body = FULL.replace("text=Text", "text=");
    let command = parse_slash_command(&body).unwrap();
    assert_eq!(command.text, "");
}

#[test]
fn test_decoding() {
    assert_eq!(decode_url_component("a+b%20c").unwrap(), "a b c");
    assert_eq!(decode_url_component("%F0%9F%8E%89").unwrap(), "🎉");
    assert!(matches!(
        decode_url_component("%FF"),
        Err(ExportError::Parse(_))
    ));
}

#[test]
fn test_bare_keys_and_duplicates() {
    let form = parse_form("flag&a=1&a=2").unwrap();
    assert_eq!(form.get("flag").map(String::as_str), Some(""));
    assert_eq!(form.get("a").map(String::as_str), Some("2"));
}

#[test]
fn test_task_mode_follows_text() {
    let task = parse_slash_command(FULL)
        .unwrap()
        .into_task(ExportKind::History, "https://bot.test/".into());
    assert_eq!(task.mode, ExportMode::Text);
    assert_eq!(task.kind, ExportKind::History);
    assert!(!task.correlation_id.is_empty());

    let body = FULL.replace("text=Text", "text=json+please");
    let task = parse_slash_command(&body)
        .unwrap()
        .into_task(ExportKind::Replies, "https://bot.test/".into());
    assert_eq!(task.mode, ExportMode::Json);
}
