use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::error;

/// Requests older or newer than this are treated as replays.
pub const SIGNATURE_WINDOW_SECS: u64 = 300;

const VERSION_PREFIX: &str = "v0=";

fn signing_mac(timestamp: &str, request_body: &str, signing_secret: &str) -> Option<Hmac<Sha256>> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return None;
        }
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());
    Some(mac)
}

/// Checks a Slack `v0` request signature against the current clock.
pub fn verify_slack_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    verify_slack_signature_at(request_body, timestamp, signature, signing_secret, now)
}

/// As [`verify_slack_signature`], with `now_secs` as the current Unix time.
pub fn verify_slack_signature_at(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
    now_secs: u64,
) -> bool {
    let Ok(ts) = timestamp.trim().parse::<u64>() else {
        error!("Unparseable request timestamp '{}'", timestamp);
        return false;
    };
    if now_secs.abs_diff(ts) > SIGNATURE_WINDOW_SECS {
        error!("Timestamp out of range, potential replay attack");
        return false;
    }

    let Some(expected) = signature
        .strip_prefix(VERSION_PREFIX)
        .and_then(|h| hex::decode(h).ok())
    else {
        error!("Malformed signature header '{}'", signature);
        return false;
    };

    let Some(mac) = signing_mac(timestamp, request_body, signing_secret) else {
        return false;
    };
    if mac.verify_slice(&expected).is_ok() {
        true
    } else {
        error!("Signature verification failed");
        false
    }
}

/// The `X-Slack-Signature` value Slack would send for this request.
#[must_use]
pub fn compute_signature(timestamp: &str, request_body: &str, signing_secret: &str) -> String {
    match signing_mac(timestamp, request_body, signing_secret) {
        Some(mac) => format!("{VERSION_PREFIX}{}", hex::encode(mac.finalize().into_bytes())),
        None => String::new(),
    }
}
