//! Unverified credential claims
//!
//! The role is read straight out of the token's payload segment without
//! checking the signature. It is a local hint for what to show, never a
//! security boundary: the backend re-checks every request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::models::Role;

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    role: Option<String>,
}

/// Decode the `role` claim, or `None` if the token or claim is malformed
pub fn decode_role(token: &str) -> Option<Role> {
    let payload = token.split('.').nth(1)?;
    // Some issuers keep the padding
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.role?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_admin() {
        let token = token_with(r#"{"sub":"1","role":"admin","exp":1757066400}"#);
        assert_eq!(decode_role(&token), Some(Role::Admin));
    }

    #[test]
    fn test_decode_user() {
        let token = token_with(r#"{"sub":"2","role":"user"}"#);
        assert_eq!(decode_role(&token), Some(Role::User));
    }

    #[test]
    fn test_missing_claim() {
        let token = token_with(r#"{"sub":"3"}"#);
        assert_eq!(decode_role(&token), None);
    }

    #[test]
    fn test_unknown_role() {
        let token = token_with(r#"{"role":"superuser"}"#);
        assert_eq!(decode_role(&token), None);
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(decode_role(""), None);
        assert_eq!(decode_role("opaque-token"), None);
        assert_eq!(decode_role("a.!!!.c"), None);
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("role=admin"));
        assert_eq!(decode_role(&not_json), None);
    }

    #[test]
    fn test_padded_payload() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"role":"admin"}"#);
        let token = format!("h.{}.s", payload);
        assert_eq!(decode_role(&token), Some(Role::Admin));
    }
}
