use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use uuid::Uuid;

use crate::core::models::{ExportKind, ExportMode, ExportTask};
use crate::errors::ExportError;

/// Form fields every export command must carry.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "team_id",
    "team_domain",
    "channel_id",
    "channel_name",
    "response_url",
    "text",
];

/// Decodes one `application/x-www-form-urlencoded` component.
///
/// ```
/// use slack_exporter::api::parsing::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("1%2B1").unwrap(), "1+1");
/// ```
pub fn decode_url_component(input: &str) -> Result<String, ExportError> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| ExportError::Parse(format!("Failed to decode URL component: {e}")))
}

/// Splits a form body into fields. Later duplicates win; a bare key maps to
/// an empty value.
pub fn parse_form(body: &str) -> Result<HashMap<String, String>, ExportError> {
    let mut map = HashMap::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        map.insert(decode_url_component(key)?, decode_url_component(value)?);
    }
    Ok(map)
}

/// The fields of an `/export-channel` or `/export-replies` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub response_url: String,
    pub text: String,
}

impl SlashCommand {
    /// # Errors
    ///
    /// [`ExportError::MissingField`] naming the first absent required field.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ExportError> {
        let field = |key: &str| {
            form.get(key)
                .cloned()
                .ok_or_else(|| ExportError::MissingField(format!("missing form field '{key}'")))
        };

        Ok(Self {
            team_id: field("team_id")?,
            team_domain: field("team_domain")?,
            channel_id: field("channel_id")?,
            channel_name: field("channel_name")?,
            response_url: field("response_url")?,
            text: field("text")?,
        })
    }

    #[must_use]
    pub fn into_task(self, kind: ExportKind, url_root: String) -> ExportTask {
        ExportTask {
            correlation_id: Uuid::new_v4().to_string(),
            kind,
            mode: ExportMode::from_command_text(&self.text),
            team_id: self.team_id,
            team_domain: self.team_domain,
            channel_id: self.channel_id,
            channel_name: self.channel_name,
            response_url: self.response_url,
            url_root,
        }
    }
}

/// Parses a raw slash command body.
///
/// ```
/// use slack_exporter::api::parsing::parse_slash_command;
///
/// let body = "team_id=T1&team_domain=acme&channel_id=C1&channel_name=general&\
///             response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1&text=text";
/// let command = parse_slash_command(body).unwrap();
/// assert_eq!(command.team_domain, "acme");
/// assert_eq!(command.response_url, "https://hooks.slack.com/commands/1");
/// ```
pub fn parse_slash_command(body: &str) -> Result<SlashCommand, ExportError> {
    SlashCommand::from_form(&parse_form(body)?)
}
