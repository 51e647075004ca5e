//! Credential extraction and compact-token framing.
//!
//! Nothing here touches keys or signatures: it only answers "is this shaped
//! like `Bearer <header>.<payload>.<signature>`" and reads the unverified header.

use jsonwebtoken::Algorithm;

use super::error::AuthError;

const SCHEME: &str = "Bearer";

/// Unverified JOSE header fields the guard needs for key resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    pub kid: String,
    pub alg: Algorithm,
}

/// Pull the token out of an `Authorization` header value.
///
/// `None` means the header was absent.
pub fn extract_token(header_value: Option<&str>) -> Result<&str, AuthError> {
    let value = header_value.ok_or(AuthError::MissingCredential)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Check the three-segment framing and decode the unverified header.
pub fn decode_header(token: &str) -> Result<TokenHeader, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedCredential(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(AuthError::MalformedCredential("empty segment".to_string()));
    }

    let header = jsonwebtoken::decode_header(token)
        .map_err(|e| AuthError::MalformedCredential(format!("unreadable header: {e}")))?;

    let kid = header
        .kid
        .filter(|kid| !kid.trim().is_empty())
        .ok_or_else(|| AuthError::MalformedCredential("header has no kid".to_string()))?;

    Ok(TokenHeader {
        kid,
        alg: header.alg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    fn segment(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    #[test]
    fn extract_accepts_bearer_token() {
        assert_eq!(extract_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn extract_requires_header() {
        assert_eq!(extract_token(None), Err(AuthError::MissingCredential));
    }

    #[test]
    fn extract_rejects_wrong_scheme() {
        assert_eq!(
            extract_token(Some("Token abc.def.ghi")),
            Err(AuthError::MalformedHeader)
        );
        // scheme is case-sensitive
        assert_eq!(
            extract_token(Some("bearer abc.def.ghi")),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn extract_rejects_wrong_part_count() {
        assert_eq!(extract_token(Some("Bearer")), Err(AuthError::MalformedHeader));
        assert_eq!(extract_token(Some("")), Err(AuthError::MalformedHeader));
        assert_eq!(
            extract_token(Some("Bearer abc.def.ghi extra")),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn decode_rejects_bad_framing() {
        for token in ["abc", "abc.def", "a.b.c.d", "abc..ghi", ".def.ghi"] {
            assert!(
                matches!(decode_header(token), Err(AuthError::MalformedCredential(_))),
                "{token} should be malformed"
            );
        }
    }

    #[test]
    fn decode_rejects_garbage_header() {
        assert!(matches!(
            decode_header("abc.def.ghi"),
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[test]
    fn decode_requires_kid() {
        let token = format!("{}.e30.c2ln", segment(r#"{"alg":"RS256","typ":"JWT"}"#));
        assert!(matches!(
            decode_header(&token),
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[test]
    fn decode_reads_kid_and_alg() {
        let token = format!(
            "{}.e30.c2ln",
            segment(r#"{"alg":"EdDSA","typ":"JWT","kid":"k1"}"#)
        );
        let header = decode_header(&token).expect("header");
        assert_eq!(header.kid, "k1");
        assert_eq!(header.alg, Algorithm::EdDSA);
    }
}
