//! EdDSA JWS compact serialization and the matching JWK, without a JWT library.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

fn b64url_json(value: &Value) -> Result<String, serde_json::Error> {
    let s = serde_json::to_string(value)?;
    Ok(URL_SAFE_NO_PAD.encode(s.as_bytes()))
}

fn b64url_bytes(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// base64url of the raw 32-byte public key (the JWK `x` member).
pub fn public_x(key: &SigningKey) -> String {
    b64url_bytes(key.verifying_key().as_bytes())
}

/// RFC 7638 thumbprint, used as the default `kid`.
pub fn thumbprint(key: &SigningKey) -> String {
    // canonical form: members {crv,kty,x} in lexicographic order, no whitespace
    let canonical = format!(
        "{{\"crv\":\"Ed25519\",\"kty\":\"OKP\",\"x\":\"{}\"}}",
        public_x(key)
    );
    b64url_bytes(&Sha256::digest(canonical.as_bytes()))
}

pub fn jwks(key: &SigningKey, kid: &str) -> Value {
    json!({
        "keys": [{
            "kty": "OKP",
            "crv": "Ed25519",
            "use": "sig",
            "alg": "EdDSA",
            "kid": kid,
            "x": public_x(key),
        }]
    })
}

pub fn sign(key: &SigningKey, kid: &str, claims: &Value) -> Result<String, serde_json::Error> {
    let header = json!({
        "typ": "JWT",
        "alg": "EdDSA",
        "kid": kid,
    });

    let signing_input = format!("{}.{}", b64url_json(&header)?, b64url_json(claims)?);
    let sig = key.sign(signing_input.as_bytes());

    Ok(format!(
        "{}.{}",
        signing_input,
        b64url_bytes(sig.to_bytes().as_slice())
    ))
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, DecodingKey, Validation};

    use super::*;

    fn key() -> SigningKey {
        SigningKey::from_bytes(&[5; 32])
    }

    #[test]
    fn token_verifies_against_the_published_key() {
        let key = key();
        let claims = json!({
            "iss": "https://issuer/",
            "aud": "api",
            "sub": "auth0|manager",
            "exp": 4_102_444_800i64,
            "permissions": ["post:drinks"],
        });
        let token = sign(&key, "dev", &claims).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.kid.as_deref(), Some("dev"));
        assert_eq!(header.alg, Algorithm::EdDSA);

        let decoding = DecodingKey::from_ed_components(&public_x(&key)).unwrap();
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&["https://issuer/"]);
        validation.set_audience(&["api"]);
        let data = jsonwebtoken::decode::<Value>(&token, &decoding, &validation).unwrap();
        assert_eq!(data.claims, claims);
    }

    #[test]
    fn jwks_describes_one_signing_key() {
        let doc = jwks(&key(), "dev");
        let keys = doc["keys"].as_array().unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0]["kid"], "dev");
        assert_eq!(keys[0]["x"], public_x(&key()));
    }

    #[test]
    fn thumbprint_is_stable_and_key_specific() {
        assert_eq!(thumbprint(&key()), thumbprint(&key()));
        assert_ne!(thumbprint(&key()), thumbprint(&SigningKey::from_bytes(&[6; 32])));
        assert_eq!(thumbprint(&key()).len(), 43);
    }
}
