//! Cryptographic utilities for launch-payload verification
//!
//! This module provides security-critical primitives that must be implemented
//! correctly to prevent timing attacks and other side-channel vulnerabilities.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Key-derivation constant fixed by the Telegram Web App protocol
const WEB_APP_DATA: &[u8] = b"WebAppData";

/// Compute HMAC-SHA256 of `message` under `key`
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    // This cannot fail: Hmac<Sha256> accepts keys of any length
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts any key length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Derive the per-installation secret from the bot token.
///
/// The protocol keys an HMAC over the literal string `"WebAppData"` with the
/// bot token as the *message*, not the key. Swapping the two produces hashes
/// that never match anything Telegram issues.
pub fn derive_web_app_secret(bot_secret: &str) -> [u8; 32] {
    hmac_sha256(WEB_APP_DATA, bot_secret.as_bytes())
}

/// Compute the expected `hash` field for a data-check string, lowercase hex
pub fn init_data_hash(bot_secret: &str, check_string: &str) -> String {
    let derived = derive_web_app_secret(bot_secret);
    hex::encode(hmac_sha256(&derived, check_string.as_bytes()))
}

/// Constant-time byte slice comparison.
///
/// Returns `false` immediately if lengths differ (length is not secret),
/// otherwise compares every byte through an XOR accumulator so the runtime
/// does not depend on where the first difference sits.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let result = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    result == 0
}

/// Case-insensitive, constant-time comparison of two hex strings
#[inline]
pub fn constant_time_hex_eq(a: &str, b: &str) -> bool {
    let a = a.to_ascii_lowercase();
    let b = b.to_ascii_lowercase();
    constant_time_eq(a.as_bytes(), b.as_bytes())
}
