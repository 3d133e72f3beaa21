// ============================================================================
// JWT - Client-side expiry estimate
// ============================================================================
// The signature is NOT verified here. The API still checks every request;
// this only lets the client drop a session it already knows is stale.
// ============================================================================

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry, epoch seconds
    pub exp: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
}

/// Decode the middle segment of a `header.payload.signature` token.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expired when `exp * 1000 < now_ms`. Undecodable tokens and tokens
/// without `exp` count as expired.
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    match decode_claims(token).and_then(|c| c.exp) {
        Some(exp) => exp.saturating_mul(1000) < now_ms,
        None => true,
    }
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_millis())
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
pub(crate) fn make_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW_MS: i64 = 1_700_000_000_000;

    #[test]
    fn test_past_exp_is_expired() {
        let token = make_token(&json!({ "exp": NOW_MS / 1000 - 60 }));
        assert!(is_expired_at(&token, NOW_MS));
    }

    #[test]
    fn test_future_exp_is_valid() {
        let token = make_token(&json!({ "exp": NOW_MS / 1000 + 3600, "role": "vendor" }));
        assert!(!is_expired_at(&token, NOW_MS));
        assert_eq!(decode_claims(&token).unwrap().role.as_deref(), Some("vendor"));
    }

    #[test]
    fn test_exp_boundary_uses_milliseconds() {
        let token = make_token(&json!({ "exp": NOW_MS / 1000 }));
        assert!(!is_expired_at(&token, NOW_MS));
        assert!(is_expired_at(&token, NOW_MS + 1));
    }

    #[test]
    fn test_garbage_payload_is_expired() {
        assert!(is_expired_at("not-a-token", NOW_MS));
        assert!(is_expired_at("a.%%%%.c", NOW_MS));

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(is_expired_at(&not_json, NOW_MS));
    }

    #[test]
    fn test_missing_exp_is_expired() {
        let token = make_token(&json!({ "sub": 42 }));
        assert!(is_expired_at(&token, NOW_MS));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let body = URL_SAFE_NO_PAD.encode(json!({ "exp": NOW_MS / 1000 + 10 }).to_string());
        let token = format!("h.{}==.s", body);
        assert!(!is_expired_at(&token, NOW_MS));
    }
}
