//! Launch-payload (`initData`) parsing and canonicalization
//!
//! The payload is a percent-encoded query string. Parsing decodes it into a
//! sorted field map; the data-check string derived from that map is the sole
//! input to HMAC verification and must match the issuing platform byte for
//! byte.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field carrying the keyed-hash authenticity value
pub const HASH_FIELD: &str = "hash";
/// Field carrying the detached-signature authenticity value
pub const SIGNATURE_FIELD: &str = "signature";
/// Field carrying the JSON-encoded identity claim
pub const USER_FIELD: &str = "user";
/// Field carrying the issue timestamp (Unix seconds)
pub const AUTH_DATE_FIELD: &str = "auth_date";

/// Payload parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload string is empty
    #[error("empty payload")]
    Empty,

    /// A pair is missing its `=` separator
    #[error("malformed key/value pair")]
    MalformedPair,

    /// A key or value is not valid percent-encoded UTF-8
    #[error("invalid percent-encoding")]
    BadEncoding,
}

/// A parsed launch payload.
///
/// Keys are unique with last-write-wins on duplicates, matching standard
/// query-string semantics. The map is ordered, so the data-check string falls
/// out of plain iteration.
#[derive(Debug, Clone)]
pub struct InitData {
    fields: BTreeMap<String, String>,
}

impl InitData {
    /// Parse a raw, still percent-encoded payload.
    ///
    /// Splits pairs on `&` and each pair on its first `=` only; both halves
    /// are percent-decoded as UTF-8.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        if raw.is_empty() {
            return Err(PayloadError::Empty);
        }

        let mut fields = BTreeMap::new();
        for pair in raw.split('&') {
            let (key, value) = pair.split_once('=').ok_or(PayloadError::MalformedPair)?;
            let key = urlencoding::decode(key).map_err(|_| PayloadError::BadEncoding)?;
            let value = urlencoding::decode(value).map_err(|_| PayloadError::BadEncoding)?;
            fields.insert(key.into_owned(), value.into_owned());
        }

        Ok(Self { fields })
    }

    /// Get a decoded field value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The keyed-hash field, if present and non-empty
    pub fn hash(&self) -> Option<&str> {
        self.get(HASH_FIELD).filter(|v| !v.is_empty())
    }

    /// The detached-signature field, if present and non-empty
    pub fn signature(&self) -> Option<&str> {
        self.get(SIGNATURE_FIELD).filter(|v| !v.is_empty())
    }

    /// Build the data-check string: every field except the authenticity
    /// fields, as `key=value` lines sorted by key and joined with `\n`.
    pub fn check_string(&self) -> String {
        self.fields
            .iter()
            .filter(|(k, _)| k.as_str() != HASH_FIELD && k.as_str() != SIGNATURE_FIELD)
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Decode the identity claim embedded in the `user` field
    pub fn identity_claim(&self) -> Option<IdentityClaim> {
        let user = self.get(USER_FIELD)?;
        serde_json::from_str(user).ok()
    }
}

/// The identity claim Telegram embeds in the `user` field.
///
/// Only `id` is trusted as a stable key; the rest is display metadata that
/// gets refreshed into the local user row on every authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl IdentityClaim {
    /// Display name stored on the user row: `trim(first + " " + last)`
    pub fn display_name(&self) -> String {
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", self.first_name, last).trim().to_string()
    }

    /// Avatar URL, dropping empty strings
    pub fn avatar(&self) -> Option<&str> {
        self.photo_url.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_fields() {
        let data = InitData::parse("auth_date=1700000000&query_id=AAH").unwrap();
        assert_eq!(data.get("auth_date"), Some("1700000000"));
        assert_eq!(data.get("query_id"), Some("AAH"));
        assert_eq!(data.get("missing"), None);
    }

    #[test]
    fn test_parse_percent_decodes_keys_and_values() {
        let data = InitData::parse("user=%7B%22id%22%3A42%7D&a%20b=c%26d").unwrap();
        assert_eq!(data.get("user"), Some(r#"{"id":42}"#));
        assert_eq!(data.get("a b"), Some("c&d"));
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let data = InitData::parse("k=a=b=c").unwrap();
        assert_eq!(data.get("k"), Some("a=b=c"));
    }

    #[test]
    fn test_parse_duplicate_keys_last_write_wins() {
        let data = InitData::parse("k=first&k=second").unwrap();
        assert_eq!(data.get("k"), Some("second"));
    }

    #[test]
    fn test_parse_empty_rejected() {
        assert_eq!(InitData::parse("").unwrap_err(), PayloadError::Empty);
    }

    #[test]
    fn test_parse_pair_without_equals_rejected() {
        let err = InitData::parse("auth_date=1&garbage").unwrap_err();
        assert_eq!(err, PayloadError::MalformedPair);
    }

    #[test]
    fn test_check_string_sorted_and_strips_auth_fields() {
        let data = InitData::parse("hash=ff&b=2&signature=aa&a=1").unwrap();
        assert_eq!(data.check_string(), "a=1\nb=2");
    }

    #[test]
    fn test_check_string_independent_of_insertion_order() {
        let a = InitData::parse("a=1&b=2&hash=ff").unwrap();
        let b = InitData::parse("b=2&hash=ff&a=1").unwrap();
        assert_eq!(a.check_string(), b.check_string());
    }

    #[test]
    fn test_identity_claim_full() {
        let raw = "user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%2C%22last_name%22%3A%22Lee%22%2C%22photo_url%22%3A%22https%3A%2F%2Ft.me%2Fa.jpg%22%7D";
        let claim = InitData::parse(raw).unwrap().identity_claim().unwrap();
        assert_eq!(claim.id, 42);
        assert_eq!(claim.display_name(), "Ann Lee");
        assert_eq!(claim.avatar(), Some("https://t.me/a.jpg"));
    }

    #[test]
    fn test_identity_claim_first_name_only_trims() {
        let raw = "user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%7D";
        let claim = InitData::parse(raw).unwrap().identity_claim().unwrap();
        assert_eq!(claim.display_name(), "Ann");
        assert_eq!(claim.avatar(), None);
    }

    #[test]
    fn test_identity_claim_bad_json() {
        let data = InitData::parse("user=not-json&auth_date=1").unwrap();
        assert!(data.identity_claim().is_none());
    }

    #[test]
    fn test_empty_authenticity_fields_treated_as_absent() {
        let data = InitData::parse("hash=&signature=&auth_date=1").unwrap();
        assert!(data.hash().is_none());
        assert!(data.signature().is_none());
    }
}
