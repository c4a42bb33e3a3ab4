//! Telegram login widget verification.
//!
//! The widget posts the user's profile fields together with `hash`, the hex
//! HMAC-SHA256 of the sorted `key=value` lines keyed by SHA-256 of the bot token.

use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const HASH_FIELD: &str = "hash";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("payload carries no hash")]
    MissingHash,

    #[error("hash mismatch")]
    Mismatch,

    #[error("field {0} is not a scalar")]
    UnsupportedValue(String),
}

/// Renders payload values the way they appear in the check string.
pub fn render_fields(payload: &Map<String, Value>) -> Result<BTreeMap<String, String>, VerifyError> {
    payload
        .iter()
        .filter(|(key, _)| key.as_str() != HASH_FIELD)
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => "null".to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(VerifyError::UnsupportedValue(key.clone()))
                }
            };
            Ok((key.clone(), rendered))
        })
        .collect()
}

pub fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lowercase hex signature of `fields` for the given bot token.
pub fn sign(bot_token: &str, fields: &BTreeMap<String, String>) -> String {
    let secret = Sha256::digest(bot_token.as_bytes());
    let mut mac =
        HmacSha256::new_from_slice(&secret).expect("HMAC accepts keys of any length");
    mac.update(data_check_string(fields).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks `payload["hash"]` and returns the rendered, verified fields.
pub fn verify(
    bot_token: &str,
    payload: &Map<String, Value>,
) -> Result<BTreeMap<String, String>, VerifyError> {
    let claimed = match payload.get(HASH_FIELD) {
        Some(Value::String(hash)) => hash.as_str(),
        _ => return Err(VerifyError::MissingHash),
    };

    let fields = render_fields(payload)?;
    if sign(bot_token, &fields) != claimed {
        return Err(VerifyError::Mismatch);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOKEN: &str = "110201543:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw";

    fn signed(mut value: Value) -> Map<String, Value> {
        let payload = value.as_object_mut().unwrap();
        let fields = render_fields(payload).unwrap();
        payload.insert(HASH_FIELD.into(), Value::String(sign(TOKEN, &fields)));
        payload.clone()
    }

    #[test]
    fn check_string_is_sorted_and_newline_joined() {
        let payload = json!({"username": "ada", "id": 1, "auth_date": 1700000000, "hash": "x"});
        let fields = render_fields(payload.as_object().unwrap()).unwrap();
        assert_eq!(
            data_check_string(&fields),
            "auth_date=1700000000\nid=1\nusername=ada"
        );
    }

    #[test]
    fn known_vectors() {
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), "1".to_string());
        assert_eq!(
            sign("token", &fields),
            "da3390fdab776b53ecd2b70a88e4cd243c57f5eba90506578209e8d22f66351b"
        );

        fields.insert("first_name".to_string(), "A".to_string());
        assert_eq!(
            sign(TOKEN, &fields),
            "369edc31fe0cf2a081de37a056b0257232893fd580094af42f2667ea62dae025"
        );
    }

    #[test]
    fn correct_hash_verifies() {
        let payload = signed(json!({"id": "1", "first_name": "A"}));
        let fields = verify(TOKEN, &payload).unwrap();
        assert_eq!(fields.get("id").map(String::as_str), Some("1"));
        assert!(!fields.contains_key(HASH_FIELD));
    }

    #[test]
    fn tampered_hash_is_rejected() {
        let payload = signed(json!({"id": 77, "first_name": "A", "auth_date": 1}));
        let good = payload[HASH_FIELD].as_str().unwrap().to_string();

        // Flip each hex digit in turn.
        for i in 0..good.len() {
            let mut bytes = good.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let mut tampered = payload.clone();
            tampered.insert(
                HASH_FIELD.into(),
                Value::String(String::from_utf8(bytes).unwrap()),
            );
            assert_eq!(verify(TOKEN, &tampered), Err(VerifyError::Mismatch));
        }
    }

    #[test]
    fn tampered_field_is_rejected() {
        let mut payload = signed(json!({"id": "1", "first_name": "A"}));
        payload.insert("first_name".into(), json!("B"));
        assert_eq!(verify(TOKEN, &payload), Err(VerifyError::Mismatch));
    }

    #[test]
    fn wrong_token_is_rejected() {
        let payload = signed(json!({"id": "1"}));
        assert_eq!(verify("other-token", &payload), Err(VerifyError::Mismatch));
    }

    #[test]
    fn uppercase_hex_is_rejected() {
        let mut payload = signed(json!({"id": "1"}));
        let upper = payload[HASH_FIELD].as_str().unwrap().to_uppercase();
        payload.insert(HASH_FIELD.into(), Value::String(upper));
        assert_eq!(verify(TOKEN, &payload), Err(VerifyError::Mismatch));
    }

    #[test]
    fn missing_hash_is_rejected() {
        let payload = json!({"id": "1"});
        assert_eq!(
            verify(TOKEN, payload.as_object().unwrap()),
            Err(VerifyError::MissingHash)
        );
    }

    #[test]
    fn nested_values_are_unsupported() {
        let payload = json!({"id": "1", "extra": {"a": 1}, "hash": "00"});
        assert_eq!(
            verify(TOKEN, payload.as_object().unwrap()),
            Err(VerifyError::UnsupportedValue("extra".into()))
        );
    }
}
