use slack_exporter::api::signature::{
    SIGNATURE_WINDOW_SECS, compute_signature, verify_slack_signature_at,
};

const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
const BODY: &str = "token=xyz&team_id=T1&command=%2Fexport-channel&text=text";
const NOW: u64 = 1_700_000_000;

#[test]
fn test_valid_signature_is_accepted() {
    let ts = NOW.to_string();
    let signature = compute_signature(&ts, BODY, SECRET);
    assert!(signature.starts_with("v0="));
    assert_eq!(signature.len(), 3 + 64);
    assert!(verify_slack_signature_at(BODY, &ts, &signature, SECRET, NOW));
}

#[test]
fn test_tampered_body_is_rejected() {
    let ts = NOW.to_string();
    let signature = compute_signature(&ts, BODY, SECRET);
    let tampered = BODY.replace("T1", "T2");
    assert!(!verify_slack_signature_at(&tampered, &ts, &signature, SECRET, NOW));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let ts = NOW.to_string();
    let signature = compute_signature(&ts, BODY, "another-secret");
    assert!(!verify_slack_signature_at(BODY, &ts, &signature, SECRET, NOW));
}

#[test]
fn test_stale_and_future_timestamps_are_rejected() {
    let stale = (NOW - SIGNATURE_WINDOW_SECS - 1).to_string();
    let signature = compute_signature(&stale, BODY, SECRET);
    assert!(!verify_slack_signature_at(BODY, &stale, &signature, SECRET, NOW));

    let future = (NOW + SIGNATURE_WINDOW_SECS + 1).to_string();
    let signature = compute_signature(&future, BODY, SECRET);
    assert!(!verify_slack_signature_at(BODY, &future, &signature, SECRET, NOW));

    let edge = (NOW - SIGNATURE_WINDOW_SECS).to_string();
    let signature = compute_signature(&edge, BODY, SECRET);
    assert!(verify_slack_signature_at(BODY, &edge, &signature, SECRET, NOW));
}

#[test]
fn test_malformed_inputs_are_rejected() {
    let ts = NOW.to_string();
    let signature = compute_signature(&ts, BODY, SECRET);
    assert!(!verify_slack_signature_at(BODY, "yesterday", &signature, SECRET, NOW));
    assert!(!verify_slack_signature_at(BODY, &ts, "v0=not-hex", SECRET, NOW));
    assert!(!verify_slack_signature_at(
        BODY,
        &ts,
        signature.trim_start_matches("v0="),
        SECRET,
        NOW
    ));
}
