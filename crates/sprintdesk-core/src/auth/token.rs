//! Signed admin session tokens.
//!
//! A token is `v1.{payload}.{signature}` where `payload` is the base64url
//! JSON `{"email":..,"iat":..}` and `signature` is the base64url
//! HMAC-SHA256 of `v1.{payload}` under the server secret. Both parts use the
//! URL-safe alphabet without padding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_VERSION: &str = "v1";

/// Lifetime of the session cookie, in seconds (30 days).
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// What an admin session token carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub email: String,
    /// Issue time, seconds since the Unix epoch
    pub iat: i64,
}

/// Why a token was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token must have three dot-separated parts")]
    Malformed,
    #[error("unsupported token version '{0}'")]
    UnsupportedVersion(String),
    #[error("token part is not valid base64url")]
    Encoding,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token payload is not a valid session: {0}")]
    InvalidPayload(String),
    #[error("token expired")]
    Expired,
    #[error("token issued in the future")]
    IssuedInFuture,
    #[error("signing key rejected: {0}")]
    Key(String),
}

fn mac_for(message: &str, secret: &[u8]) -> Result<HmacSha256, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|e| TokenError::Key(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(mac)
}

/// Issues a token for `payload`.
pub fn create_token(payload: &SessionPayload, secret: &[u8]) -> Result<String, TokenError> {
    let json =
        serde_json::to_vec(payload).map_err(|e| TokenError::InvalidPayload(e.to_string()))?;
    let message = format!("{TOKEN_VERSION}.{}", URL_SAFE_NO_PAD.encode(json));

    let signature = mac_for(&message, secret)?.finalize().into_bytes();
    Ok(format!("{message}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Checks shape, version, signature and payload. Age is not checked.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<SessionPayload, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [version, body, signature] = parts.as_slice() else {
        return Err(TokenError::Malformed);
    };
    if version.is_empty() || body.is_empty() || signature.is_empty() {
        return Err(TokenError::Malformed);
    }
    if *version != TOKEN_VERSION {
        return Err(TokenError::UnsupportedVersion((*version).to_string()));
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::Encoding)?;
    mac_for(&format!("{version}.{body}"), secret)?
        .verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)?;

    let json = URL_SAFE_NO_PAD.decode(body).map_err(|_| TokenError::Encoding)?;
    let payload: SessionPayload =
        serde_json::from_slice(&json).map_err(|e| TokenError::InvalidPayload(e.to_string()))?;
    if payload.email.trim().is_empty() {
        return Err(TokenError::InvalidPayload("email is empty".into()));
    }

    Ok(payload)
}

/// Like [`verify_token`], also refusing tokens older than
/// [`SESSION_MAX_AGE_SECS`] at `now` or issued after it.
pub fn verify_token_at(
    token: &str,
    secret: &[u8],
    now: Timestamp,
) -> Result<SessionPayload, TokenError> {
    let payload = verify_token(token, secret)?;
    let now = now.as_second();
    if payload.iat > now {
        return Err(TokenError::IssuedInFuture);
    }
    if now.saturating_sub(payload.iat) > SESSION_MAX_AGE_SECS {
        return Err(TokenError::Expired);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn signed_raw(json: &[u8]) -> String {
        let message = format!("v1.{}", URL_SAFE_NO_PAD.encode(json));
        let sig = mac_for(&message, SECRET).unwrap().finalize().into_bytes();
        format!("{message}.{}", URL_SAFE_NO_PAD.encode(sig))
    }

    fn payload() -> SessionPayload {
        SessionPayload {
            email: "admin@agency.example".into(),
            iat: 1_764_000_000,
        }
    }

    #[test]
    fn test_issued_token_verifies() {
        let token = create_token(&payload(), SECRET).unwrap();

        assert!(token.starts_with("v1."));
        assert_eq!(token.split('.').count(), 3);
        assert!(!token.contains('='));
        assert_eq!(verify_token(&token, SECRET).unwrap(), payload());
    }

    #[test]
    fn test_payload_is_plain_json() {
        let token = create_token(&payload(), SECRET).unwrap();
        let body = token.split('.').nth(1).unwrap();
        let json = String::from_utf8(URL_SAFE_NO_PAD.decode(body).unwrap()).unwrap();
        assert_eq!(json, r#"{"email":"admin@agency.example","iat":1764000000}"#);
    }

    #[test]
    fn test_wrong_secret_or_tampering_is_refused() {
        let token = create_token(&payload(), SECRET).unwrap();
        assert_eq!(verify_token(&token, b"other"), Err(TokenError::BadSignature));

        let forged_body = URL_SAFE_NO_PAD.encode(br#"{"email":"evil@x","iat":1}"#);
        let sig = token.rsplit('.').next().unwrap();
        let forged = format!("v1.{forged_body}.{sig}");
        assert_eq!(verify_token(&forged, SECRET), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_shape_and_version_errors() {
        assert_eq!(verify_token("v1.abc", SECRET), Err(TokenError::Malformed));
        assert_eq!(verify_token("v1..sig", SECRET), Err(TokenError::Malformed));
        assert_eq!(verify_token("a.b.c.d", SECRET), Err(TokenError::Malformed));
        assert_eq!(
            verify_token("v2.abc.def", SECRET),
            Err(TokenError::UnsupportedVersion("v2".into()))
        );
        assert_eq!(verify_token("v1.abc.***", SECRET), Err(TokenError::Encoding));
    }

    #[test]
    fn test_payload_shape_is_checked() {
        assert!(matches!(
            verify_token(&signed_raw(br#"{"email":"","iat":1}"#), SECRET),
            Err(TokenError::InvalidPayload(_))
        ));
        assert!(matches!(
            verify_token(&signed_raw(br#"{"email":"a@b","iat":"now"}"#), SECRET),
            Err(TokenError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_expiry() {
        let token = create_token(&payload(), SECRET).unwrap();
        let issued = Timestamp::from_second(payload().iat).unwrap();

        let within = Timestamp::from_second(payload().iat + SESSION_MAX_AGE_SECS).unwrap();
        let after = Timestamp::from_second(payload().iat + SESSION_MAX_AGE_SECS + 1).unwrap();

        assert!(verify_token_at(&token, SECRET, issued).is_ok());
        assert!(verify_token_at(&token, SECRET, within).is_ok());
        assert_eq!(verify_token_at(&token, SECRET, after), Err(TokenError::Expired));
    }

    #[test]
    fn test_issue_time_extremes() {
        let now = Timestamp::from_second(payload().iat).unwrap();

        let ancient = signed_raw(br#"{"email":"a@b","iat":-9223372036854775808}"#);
        assert_eq!(verify_token_at(&ancient, SECRET, now), Err(TokenError::Expired));

        let future = create_token(
            &SessionPayload {
                iat: payload().iat + 1,
                ..payload()
            },
            SECRET,
        )
        .unwrap();
        assert!(verify_token(&future, SECRET).is_ok());
        assert_eq!(
            verify_token_at(&future, SECRET, now),
            Err(TokenError::IssuedInFuture)
        );

        let far_future = signed_raw(br#"{"email":"a@b","iat":9223372036854775807}"#);
        assert_eq!(
            verify_token_at(&far_future, SECRET, now),
            Err(TokenError::IssuedInFuture)
        );
    }
}
