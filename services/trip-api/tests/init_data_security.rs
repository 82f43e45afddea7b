//! Launch-payload security tests
//!
//! End-to-end checks of `initData` verification: signatures are built here
//! with a from-scratch HMAC construction so a bug in the production crypto
//! helpers cannot cancel itself out.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use tripline_auth_core::{AuthConfig, InitDataVerifier, RejectReason, Scheme};

type HmacSha256 = Hmac<Sha256>;

/// Sign a payload the way the issuing platform does: derive the key as
/// `HMAC(key="WebAppData", msg=bot_secret)`, then hash the sorted,
/// `\n`-joined data-check string under that key.
fn sign_init_data(fields: &[(&str, &str)], bot_secret: &str) -> String {
    let mut sorted: Vec<_> = fields.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    let check_string = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut derive = HmacSha256::new_from_slice(b"WebAppData").unwrap();
    derive.update(bot_secret.as_bytes());
    let derived_key = derive.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(&derived_key).unwrap();
    mac.update(check_string.as_bytes());
    let hash = hex::encode(mac.finalize().into_bytes());

    let mut encoded: Vec<String> = fields
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    encoded.push(format!("hash={hash}"));
    encoded.join("&")
}

fn verifier(bot_secret: &str) -> InitDataVerifier {
    InitDataVerifier::new(&AuthConfig::new().with_bot_secret(bot_secret))
}

const USER_JSON: &str = r#"{"id":990123,"first_name":"Maya","last_name":"Ivanova"}"#;

#[test]
fn test_genuine_payload_accepted() {
    let payload = sign_init_data(
        &[
            ("user", USER_JSON),
            ("auth_date", "1700000000"),
            ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
        ],
        "botsecret",
    );

    let result = verifier("botsecret").verify(&payload);
    assert!(result.valid);
    assert_eq!(result.scheme, Scheme::HashBased);
}

#[test]
fn test_tampered_user_field_rejected() {
    let payload = sign_init_data(&[("user", USER_JSON), ("auth_date", "1700000000")], "botsecret");

    // Swap in a different telegram id after signing
    let tampered = payload.replace("990123", "990124");
    assert_ne!(payload, tampered);

    let result = verifier("botsecret").verify(&tampered);
    assert!(!result.valid);
    assert_eq!(result.reason, Some(RejectReason::HashMismatch));
}

#[test]
fn test_payload_signed_with_wrong_secret_rejected() {
    let payload = sign_init_data(
        &[("user", USER_JSON), ("auth_date", "1700000000")],
        "attacker-secret",
    );
    assert!(!verifier("botsecret").verify(&payload).valid);
}

#[test]
fn test_unkeyed_sha256_is_not_accepted() {
    // A forger without the secret might try a plain hash of the check string.
    use sha2::Digest;
    let check_string = format!("auth_date=1700000000\nuser={USER_JSON}");
    let fake_hash = hex::encode(Sha256::digest(check_string.as_bytes()));
    let payload = format!(
        "user={}&auth_date=1700000000&hash={}",
        urlencoding::encode(USER_JSON),
        fake_hash
    );
    assert!(!verifier("botsecret").verify(&payload).valid);
}

#[test]
fn test_dropping_a_signed_field_rejected() {
    let payload = sign_init_data(
        &[
            ("user", USER_JSON),
            ("auth_date", "1700000000"),
            ("query_id", "AAH"),
        ],
        "botsecret",
    );

    // Strip query_id but keep the original hash
    let stripped: Vec<&str> = payload
        .split('&')
        .filter(|pair| !pair.starts_with("query_id="))
        .collect();
    let result = verifier("botsecret").verify(&stripped.join("&"));
    assert!(!result.valid);
    assert_eq!(result.reason, Some(RejectReason::HashMismatch));
}

#[test]
fn test_injected_extra_field_rejected() {
    let payload = sign_init_data(&[("user", USER_JSON), ("auth_date", "1700000000")], "botsecret");
    let injected = format!("{payload}&is_admin=true");
    assert!(!verifier("botsecret").verify(&injected).valid);
}

#[test]
fn test_hash_stripped_payload_without_secret_rejected() {
    // No hash and no configured secret: nothing to check, so nothing passes.
    let payload = format!("user={}&auth_date=1700000000", urlencoding::encode(USER_JSON));
    let config = AuthConfig::new();
    let result = InitDataVerifier::new(&config).verify(&payload);
    assert!(!result.valid);
    assert_eq!(result.reason, Some(RejectReason::UnsupportedScheme));
}

#[test]
fn test_detached_signature_replay_window() {
    let sig = "5c".repeat(64);
    let now = Utc::now();

    let fresh = format!(
        "user={}&auth_date={}&signature={}",
        urlencoding::encode(USER_JSON),
        now.timestamp() - 3600,
        sig
    );
    let config = AuthConfig::new();
    let v = InitDataVerifier::new(&config);
    assert!(v.verify_at(&fresh, now).valid);

    let replayed = format!(
        "user={}&auth_date={}&signature={}",
        urlencoding::encode(USER_JSON),
        now.timestamp() - 25 * 3600,
        sig
    );
    let result = v.verify_at(&replayed, now);
    assert!(!result.valid);
    assert_eq!(result.reason, Some(RejectReason::StalePayload));
}

#[test]
fn test_truncated_signature_rejected() {
    let now = Utc::now();
    let payload = format!(
        "user={}&auth_date={}&signature={}",
        urlencoding::encode(USER_JSON),
        now.timestamp(),
        "5c".repeat(32)
    );
    let config = AuthConfig::new();
    let result = InitDataVerifier::new(&config).verify_at(&payload, now);
    assert!(!result.valid);
    assert_eq!(result.reason, Some(RejectReason::MalformedSignature));
}

#[test]
fn test_garbage_payload_never_passes() {
    let v = verifier("botsecret");
    for raw in ["", "not-a-query-string", "&&&", "hash=", "hash=00"] {
        assert!(!v.verify(raw).valid, "accepted garbage payload: {raw:?}");
    }
}
