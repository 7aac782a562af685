use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ERROR: {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("I encountered an error: {0}")]
    Api(String),

    #[error("Something went wrong: {0}.")]
    MissingField(String),

    #[error("Failed to send HTTP request: {0}")]
    Transport(String),

    #[error("Still rate-limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Failed to download from {url} after {attempts} tries")]
    Download { url: String, attempts: usize },

    #[error("File system error: {0}")]
    Io(String),

    #[error("Failed to parse Slack request: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ExportError {
    fn from(error: reqwest::Error) -> Self {
        ExportError::Transport(error.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(error: std::io::Error) -> Self {
        ExportError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(error: serde_json::Error) -> Self {
        ExportError::MissingField(error.to_string())
    }
}
