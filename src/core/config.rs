use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

/// Seconds added on top of every server-supplied `Retry-After`.
pub const DEFAULT_RATE_LIMIT_MARGIN_SECS: u64 = 2;

pub const DEFAULT_RATE_LIMIT_MAX_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_user_token: String,
    pub api_base_url: String,
    pub slack_signing_secret: Option<String>,
    pub rate_limit_margin_secs: u64,
    pub rate_limit_max_attempts: u32,
    pub timezone: Tz,
    pub exports_dir: PathBuf,
    pub bind_addr: String,
    /// Base for download links; the request's `Host` header when unset.
    pub public_url: Option<String>,
}

impl AppConfig {
    /// Builds a config around a token with every other setting at its default.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slack_user_token: token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            slack_signing_secret: None,
            rate_limit_margin_secs: DEFAULT_RATE_LIMIT_MARGIN_SECS,
            rate_limit_max_attempts: DEFAULT_RATE_LIMIT_MAX_ATTEMPTS,
            timezone: Tz::UTC,
            exports_dir: PathBuf::from("exports"),
            bind_addr: "0.0.0.0:3000".to_string(),
            public_url: None,
        }
    }

    /// Reads the process environment, after loading `.env` if one exists.
    ///
    /// # Errors
    ///
    /// Returns a description of the first missing or malformed variable.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env is the normal case outside development.
        let _ = dotenvy::dotenv();

        let token = env::var("SLACK_USER_TOKEN")
            .map_err(|_| "Missing SLACK_USER_TOKEN in environment variables".to_string())?;
        if token.trim().is_empty() {
            return Err("SLACK_USER_TOKEN is empty".to_string());
        }

        let mut config = Self::with_token(token);

        if let Ok(base) = env::var("SLACK_API_BASE_URL") {
            config.api_base_url = base.trim_end_matches('/').to_string();
        }
        config.slack_signing_secret = env::var("SLACK_SIGNING_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());
        config.rate_limit_margin_secs =
            parse_var("SLACK_RATE_LIMIT_MARGIN_SECS", DEFAULT_RATE_LIMIT_MARGIN_SECS)?;
        config.rate_limit_max_attempts =
            parse_var("SLACK_RATE_LIMIT_MAX_ATTEMPTS", DEFAULT_RATE_LIMIT_MAX_ATTEMPTS)?;
        if config.rate_limit_max_attempts == 0 {
            return Err("SLACK_RATE_LIMIT_MAX_ATTEMPTS must be at least 1".to_string());
        }
        if let Ok(tz) = env::var("EXPORT_TIMEZONE") {
            config.timezone = tz
                .parse::<Tz>()
                .map_err(|e| format!("EXPORT_TIMEZONE: {}", e))?;
        }
        if let Ok(dir) = env::var("EXPORTS_DIR") {
            config.exports_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        config.public_url = env::var("PUBLIC_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(config)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| format!("{}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
